//! The `skillrank list-players` command.

use std::path::PathBuf;

use anyhow::Result;

use skillrank_sim::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    for (name, profile) in &config.all_players() {
        let marker = if *name == config.default_player {
            " (default)"
        } else {
            ""
        };
        println!("{name}{marker}: {}", profile.description);
        println!(
            "  draw:   radius {:.1}, wobble {:.0}%, {} points over {:.1}s",
            profile.draw.radius,
            profile.draw.wobble * 100.0,
            profile.draw.points,
            profile.draw.stroke_ms as f64 / 1000.0,
        );
        println!(
            "  mash:   {}ms +/- {}ms, {:.0}% on target, {:.0}% missed",
            profile.mash.reaction_ms,
            profile.mash.jitter_ms,
            profile.mash.accuracy * 100.0,
            profile.mash.miss_rate * 100.0,
        );
        println!(
            "  recall: {:.0}% correct after {}ms +/- {}ms",
            profile.recall.accuracy * 100.0,
            profile.recall.answer_delay_ms,
            profile.recall.jitter_ms,
        );
    }

    Ok(())
}
