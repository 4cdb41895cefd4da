//! Score stores: in-memory and JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::model::{GameKey, ScoreRecord};
use crate::traits::ScoreStore;

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, i32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored pairs.
    pub fn entries(&self) -> BTreeMap<String, i32> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ScoreStore for MemoryStore {
    fn save(&self, key: &str, value: i32) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
        Ok(())
    }

    fn load(&self, key: &str, default: i32) -> i32 {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
            .unwrap_or(default)
    }
}

/// Store persisted as a flat JSON object, rewritten on every save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, i32>>,
}

impl JsonFileStore {
    /// Open a store file, starting empty if it does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read score file {}", path.display()))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("failed to parse score file {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, i32>) -> Result<()> {
        let json = serde_json::to_string_pretty(values).context("failed to serialize scores")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write score file {}", self.path.display()))
    }
}

impl ScoreStore for JsonFileStore {
    fn save(&self, key: &str, value: i32) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
        self.flush(&values)
    }

    fn load(&self, key: &str, default: i32) -> i32 {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
            .unwrap_or(default)
    }
}

/// Read all three game scores, defaulting absent ones to 0.
pub fn load_records(store: &dyn ScoreStore) -> [ScoreRecord; 3] {
    GameKey::ALL.map(|key| ScoreRecord {
        key,
        value: store.load(key.storage_key(), 0),
    })
}
