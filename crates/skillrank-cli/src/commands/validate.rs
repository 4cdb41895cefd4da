//! The `skillrank validate` command.

use std::path::PathBuf;

use anyhow::Result;

use skillrank_sim::config::{load_config_from, validate_config};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    println!(
        "Config: {} players, {} games",
        config.all_players().len(),
        config.lineup().len()
    );

    let warnings = validate_config(&config);
    for w in &warnings {
        println!("  WARNING: {w}");
    }

    if warnings.is_empty() {
        println!("Config valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
