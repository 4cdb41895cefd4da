//! The `skillrank play` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::Instant;

use skillrank_core::error::GameError;
use skillrank_core::model::{GameKey, GameVariant, MiniGameDescriptor};
use skillrank_core::report::SessionReport;
use skillrank_core::results::ResultSummary;
use skillrank_core::session::{Session, SessionObserver};
use skillrank_core::storage::load_records;
use skillrank_sim::config::load_config_from;
use skillrank_sim::{create_host, create_store, resolve_seed, LoggingLeaderboard};

/// Console progress observer.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_game_start(&self, position: usize, total: usize, title: &str) {
        eprintln!("  Game {position}/{total}: {title}");
    }

    fn on_game_complete(&self, key: GameKey, title: &str, score: i32, elapsed: Duration) {
        eprintln!(
            "  Done: {title} [{key}] score {score} ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }

    fn on_game_error(&self, title: &str, error: &GameError) {
        eprintln!("  ERROR: {title}: {error}");
    }

    fn on_session_complete(&self, summary: &ResultSummary) {
        eprintln!(
            "\nSession complete: total {} rank {} (rank score {})",
            summary.total, summary.rank, summary.rank_score
        );
    }
}

pub async fn execute(
    player: Option<String>,
    seed: Option<u64>,
    rounds: u32,
    scores: Option<PathBuf>,
    output: Option<PathBuf>,
    game: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(rounds >= 1, "rounds must be at least 1");

    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(game) = game {
        let variant: GameVariant = game.parse().map_err(anyhow::Error::msg)?;
        let descriptor = config
            .lineup()
            .into_iter()
            .find(|g| g.variant == variant)
            .unwrap_or_else(|| MiniGameDescriptor::standard(variant));
        config.lineup = vec![descriptor];
    }
    let player = player.unwrap_or_else(|| config.default_player.clone());
    let seed = seed.unwrap_or_else(|| resolve_seed(&config));

    let host = Arc::new(create_host(&config, &player, seed)?);
    let store = create_store(&config, scores.as_deref())?;
    let leaderboard = Arc::new(LoggingLeaderboard::new());
    let lineup = config.lineup();

    eprintln!(
        "skillrank v{}: {player} plays {} games x {rounds} round(s), seed {seed}",
        env!("CARGO_PKG_VERSION"),
        lineup.len()
    );
    eprintln!();

    let mut session = Session::new(&lineup, host, store.clone(), leaderboard)
        .with_observer(Arc::new(ConsoleObserver));

    let mut reports = Vec::new();
    for round in 1..=rounds {
        if round > 1 {
            eprintln!("\nRound {round}");
            session.retry().await;
        }
        let started = Instant::now();
        let summary = session.run().await;
        let report = SessionReport::new(
            player.clone(),
            Some(seed),
            round,
            load_records(store.as_ref()).to_vec(),
            summary,
            started.elapsed().as_millis() as u64,
        );

        if let Some(dir) = &output {
            let path = dir.join(report.file_name());
            report.save_json(&path)?;
            eprintln!("Report saved to: {}", path.display());
        }
        reports.push(report);
    }

    print_summary(&reports);
    Ok(())
}

fn print_summary(reports: &[SessionReport]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Round",
        "Circle",
        "Buttons",
        "Cube",
        "Display",
        "Rank score",
        "Total",
        "Rank",
    ]);

    for report in reports {
        let s = &report.summary;
        table.add_row(vec![
            Cell::new(report.round),
            Cell::new(s.scores[0]),
            Cell::new(s.scores[1]),
            Cell::new(s.scores[2]),
            Cell::new(format!(
                "{} / {} / {}",
                s.display[0], s.display[1], s.display[2]
            )),
            Cell::new(s.rank_score),
            Cell::new(s.total),
            Cell::new(s.rank),
        ]);
    }

    println!("{table}");
}
