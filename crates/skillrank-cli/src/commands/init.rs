//! The `skillrank init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("skillrank.toml").exists() {
        println!("skillrank.toml already exists, skipping.");
    } else {
        std::fs::write("skillrank.toml", SAMPLE_CONFIG)?;
        println!("Created skillrank.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit skillrank.toml to tune the player profiles");
    println!("  2. Run: skillrank validate");
    println!("  3. Run: skillrank play --player lefty --virtual-time");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillrank configuration

# Fixed seed for reproducible sessions; remove for a fresh seed every run.
# SKILLRANK_SEED overrides this.
seed = 42
frame_rate = 60
start_delay_ms = 250
default_player = "steady"
# score_file = "scores.json"

# Built-in players: ace, steady, novice. Add your own or override them here.
[players.lefty]
description = "Draws with the other hand"

[players.lefty.draw]
start_delay_ms = 1200
stroke_ms = 7000
radius = 2.5
wobble = 0.12
points = 160

[players.lefty.mash]
reaction_ms = 400
accuracy = 0.85

[players.lefty.recall]
accuracy = 0.75

# Uncomment to replace the standard lineup.
# [[lineup]]
# title = "Draw a perfect circle"
# duration_secs = 30.0
# variant = "accuracy_draw"
#
# [[lineup]]
# title = "Hit the glowing buttons"
# duration_secs = 30.0
# variant = "reaction_mash"
#
# [[lineup]]
# title = "Remember the cube colors"
# duration_secs = 10.0
# variant = "sequence_recall"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_is_valid() {
        let config: skillrank_sim::SimConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.seed, Some(42));
        assert!(config.all_players().contains_key("lefty"));
        assert!(skillrank_sim::validate_config(&config).is_empty());
    }
}
