//! skillrank-sim — Headless simulated host and players.
//!
//! Stands in for a real game client: a console UI, simulated input devices
//! driven by player profiles, a logging leaderboard, and a scene host that
//! rebuilds all of them for every scene. Configuration comes from TOML.

pub mod config;
pub mod console;
pub mod error;
pub mod host;
pub mod leaderboard;
pub mod players;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use skillrank_core::storage::{JsonFileStore, MemoryStore};
use skillrank_core::traits::ScoreStore;

pub use config::{load_config, load_config_from, validate_config, PlayerProfile, SimConfig};
pub use error::SimError;
pub use host::{HostSettings, SimHost};
pub use leaderboard::LoggingLeaderboard;

/// The configured seed, or a fresh random one.
pub fn resolve_seed(config: &SimConfig) -> u64 {
    config.seed.unwrap_or_else(rand::random)
}

/// Create a scene host for a named player.
pub fn create_host(config: &SimConfig, player: &str, seed: u64) -> Result<SimHost> {
    let profile = config.player(player)?;
    let settings = HostSettings {
        frame_rate: config.frame_rate,
        auto_start: Some(Duration::from_millis(config.start_delay_ms)),
    };
    Ok(SimHost::new(player, profile, config.lineup(), settings, seed))
}

/// Open the score store: a JSON file when one is given or configured,
/// memory otherwise.
pub fn create_store(config: &SimConfig, path: Option<&Path>) -> Result<Arc<dyn ScoreStore>> {
    match path.or(config.score_file.as_deref()) {
        Some(path) => {
            let store = JsonFileStore::open(path)
                .with_context(|| format!("failed to open score store {}", path.display()))?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
