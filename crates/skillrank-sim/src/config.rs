//! Simulation configuration and player profiles.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skillrank_core::clock::DEFAULT_FRAME_RATE;
use skillrank_core::model::{standard_lineup, MiniGameDescriptor};

use crate::error::SimError;

/// Environment variable that overrides the configured seed.
pub const SEED_ENV: &str = "SKILLRANK_SEED";

/// How a simulated player draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawProfile {
    /// Hesitation before the pointer goes down.
    pub start_delay_ms: u64,
    /// Time to trace the whole stroke.
    pub stroke_ms: u64,
    /// Nominal circle radius in surface units.
    pub radius: f64,
    /// Radial wobble as a fraction of the radius.
    pub wobble: f64,
    /// Samples along the stroke.
    pub points: usize,
}

impl Default for DrawProfile {
    fn default() -> Self {
        Self {
            start_delay_ms: 800,
            stroke_ms: 5_000,
            radius: 3.0,
            wobble: 0.06,
            points: 180,
        }
    }
}

/// How a simulated player presses buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MashProfile {
    pub reaction_ms: u64,
    /// Reaction time varies uniformly by up to this much either way.
    pub jitter_ms: u64,
    /// Probability of pressing the lit slot rather than a neighbour.
    pub accuracy: f64,
    /// Probability of not reacting to a light at all.
    pub miss_rate: f64,
    /// Slots on the pad.
    pub slots: usize,
}

impl Default for MashProfile {
    fn default() -> Self {
        Self {
            reaction_ms: 350,
            jitter_ms: 80,
            accuracy: 0.9,
            miss_rate: 0.05,
            slots: 9,
        }
    }
}

/// How a simulated player answers cube queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallProfile {
    /// Probability of remembering the queried face correctly.
    pub accuracy: f64,
    pub answer_delay_ms: u64,
    pub jitter_ms: u64,
}

impl Default for RecallProfile {
    fn default() -> Self {
        Self {
            accuracy: 0.7,
            answer_delay_ms: 3_000,
            jitter_ms: 1_000,
        }
    }
}

/// A simulated player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub description: String,
    pub draw: DrawProfile,
    pub mash: MashProfile,
    pub recall: RecallProfile,
}

/// Top-level skillrank simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed for every random source; a fresh one is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// How long the simulated player waits before pressing start.
    #[serde(default = "default_start_delay")]
    pub start_delay_ms: u64,
    /// JSON score file; scores stay in memory when absent.
    #[serde(default)]
    pub score_file: Option<PathBuf>,
    #[serde(default = "default_player")]
    pub default_player: String,
    /// Profiles added to, or replacing, the built-in ones.
    #[serde(default)]
    pub players: BTreeMap<String, PlayerProfile>,
    /// Games in play order; the standard lineup when empty.
    #[serde(default)]
    pub lineup: Vec<MiniGameDescriptor>,
}

fn default_frame_rate() -> u32 {
    DEFAULT_FRAME_RATE
}
fn default_start_delay() -> u64 {
    250
}
fn default_player() -> String {
    "steady".to_string()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            frame_rate: default_frame_rate(),
            start_delay_ms: default_start_delay(),
            score_file: None,
            default_player: default_player(),
            players: BTreeMap::new(),
            lineup: Vec::new(),
        }
    }
}

/// Profiles available without any configuration.
pub fn builtin_players() -> BTreeMap<String, PlayerProfile> {
    let mut players = BTreeMap::new();
    players.insert(
        "ace".to_string(),
        PlayerProfile {
            description: "Fast hands, steady pen, sharp memory".to_string(),
            draw: DrawProfile {
                start_delay_ms: 400,
                stroke_ms: 2_500,
                radius: 3.5,
                wobble: 0.02,
                points: 240,
            },
            mash: MashProfile {
                reaction_ms: 250,
                jitter_ms: 50,
                accuracy: 0.98,
                miss_rate: 0.01,
                slots: 9,
            },
            recall: RecallProfile {
                accuracy: 0.95,
                answer_delay_ms: 2_000,
                jitter_ms: 500,
            },
        },
    );
    players.insert(
        "steady".to_string(),
        PlayerProfile {
            description: "Reliable all-rounder".to_string(),
            ..PlayerProfile::default()
        },
    );
    players.insert(
        "novice".to_string(),
        PlayerProfile {
            description: "First time holding the controller".to_string(),
            draw: DrawProfile {
                start_delay_ms: 2_000,
                stroke_ms: 8_000,
                radius: 2.0,
                wobble: 0.15,
                points: 120,
            },
            mash: MashProfile {
                reaction_ms: 550,
                jitter_ms: 150,
                accuracy: 0.8,
                miss_rate: 0.15,
                slots: 9,
            },
            recall: RecallProfile {
                accuracy: 0.4,
                answer_delay_ms: 5_000,
                jitter_ms: 2_000,
            },
        },
    );
    players
}

impl SimConfig {
    /// Built-in profiles overlaid with configured ones.
    pub fn all_players(&self) -> BTreeMap<String, PlayerProfile> {
        let mut players = builtin_players();
        players.extend(self.players.clone());
        players
    }

    /// Look up a profile by name.
    pub fn player(&self, name: &str) -> Result<PlayerProfile, SimError> {
        let mut players = self.all_players();
        players.remove(name).ok_or_else(|| SimError::UnknownPlayer {
            name: name.to_string(),
            available: players.keys().cloned().collect::<Vec<_>>().join(", "),
        })
    }

    /// The games to play, in order.
    pub fn lineup(&self) -> Vec<MiniGameDescriptor> {
        if self.lineup.is_empty() {
            standard_lineup()
        } else {
            self.lineup.clone()
        }
    }

    /// Apply a raw `SKILLRANK_SEED` value.
    pub fn apply_seed_override(&mut self, raw: Option<String>) -> Result<(), SimError> {
        if let Some(raw) = raw {
            let seed = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| SimError::InvalidSeed(raw.clone()))?;
            self.seed = Some(seed);
        }
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `skillrank.toml` in the current directory
/// 2. `~/.config/skillrank/config.toml`
///
/// Environment variable override: `SKILLRANK_SEED`.
pub fn load_config() -> Result<SimConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SimConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("skillrank.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config(&path)?
        }
        None => SimConfig::default(),
    };

    config.apply_seed_override(std::env::var(SEED_ENV).ok())?;
    Ok(config)
}

/// Parse one config file.
pub fn parse_config(path: &Path) -> Result<SimConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<SimConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skillrank"))
}

/// Problems worth reporting that do not stop a session from running.
pub fn validate_config(config: &SimConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.frame_rate == 0 {
        warnings.push("frame_rate is 0; 1 frame per second will be used".to_string());
    }

    let lineup = config.lineup();
    if lineup.len() != 3 {
        warnings.push(format!(
            "lineup has {} games; results always aggregate three score slots",
            lineup.len()
        ));
    }
    for (i, game) in lineup.iter().enumerate() {
        if lineup[..i].iter().any(|g| g.key() == game.key()) {
            warnings.push(format!(
                "lineup entry {} ('{}') reuses score slot {}",
                i + 1,
                game.title,
                game.key().storage_key()
            ));
        }
        if !game.duration_secs.is_finite() {
            warnings.push(format!(
                "lineup entry {} ('{}') has a non-finite duration; it will end at once",
                i + 1,
                game.title
            ));
        } else if game.duration_secs <= 0.0 {
            warnings.push(format!(
                "lineup entry {} ('{}') has a non-positive duration",
                i + 1,
                game.title
            ));
        }
    }

    let players = config.all_players();
    if !players.contains_key(&config.default_player) {
        warnings.push(format!(
            "default_player '{}' is not a known profile",
            config.default_player
        ));
    }
    for (name, profile) in &players {
        let probabilities = [
            ("mash.accuracy", profile.mash.accuracy),
            ("mash.miss_rate", profile.mash.miss_rate),
            ("recall.accuracy", profile.recall.accuracy),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                warnings.push(format!("player '{name}': {field} = {value} is outside [0, 1]"));
            }
        }
        if profile.mash.slots == 0 {
            warnings.push(format!("player '{name}': mash.slots is 0; nothing will light"));
        }
        if profile.draw.points < 100 {
            warnings.push(format!(
                "player '{name}': draw.points = {} is below the 100-point stroke minimum",
                profile.draw.points
            ));
        }
    }

    warnings
}
