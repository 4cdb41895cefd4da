//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ScoreRecord;
use crate::results::ResultSummary;

/// One finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Name of the simulated or real player.
    pub player: String,
    /// Seed of the random source, when the run was reproducible.
    pub seed: Option<u64>,
    /// 1-based round when several sessions were played back to back.
    pub round: u32,
    /// Stored per-game scores at the end of the session.
    pub records: Vec<ScoreRecord>,
    pub summary: ResultSummary,
    /// Session duration in milliseconds, on the session's clock.
    pub duration_ms: u64,
}

impl SessionReport {
    pub fn new(
        player: impl Into<String>,
        seed: Option<u64>,
        round: u32,
        records: Vec<ScoreRecord>,
        summary: ResultSummary,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            player: player.into(),
            seed,
            round,
            records,
            summary,
            duration_ms,
        }
    }

    /// File name used when writing into an output directory.
    pub fn file_name(&self) -> String {
        format!(
            "skillrank-{}-r{}-{}.json",
            self.created_at.format("%Y%m%d-%H%M%S"),
            self.round,
            &self.id.simple().to_string()[..8]
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
