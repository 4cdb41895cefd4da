//! Full simulated sessions on a paused clock.

use std::sync::Arc;

use skillrank_core::results::{ResultSummary, RANK_BOARD_ID};
use skillrank_core::session::{Phase, Session};
use skillrank_core::traits::ScoreStore;
use skillrank_sim::{create_host, create_store, LoggingLeaderboard, SimConfig};

async fn play(player: &str, seed: u64) -> (ResultSummary, Arc<skillrank_sim::SimHost>) {
    let config = SimConfig::default();
    let host = Arc::new(create_host(&config, player, seed).unwrap());
    let store = create_store(&config, None).unwrap();
    let board = Arc::new(LoggingLeaderboard::new());
    let mut session = Session::new(&config.lineup(), host.clone(), store, board.clone());

    let summary = session.run().await;

    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.play_count(), 3);
    assert_eq!(board.best(RANK_BOARD_ID), Some(f64::from(summary.rank_score)));
    (summary, host)
}

#[tokio::test(start_paused = true)]
async fn ace_session_completes_with_strong_scores() {
    let (summary, host) = play("ace", 2024).await;

    assert!(summary.scores[0] >= 90, "draw score {}", summary.scores[0]);
    assert!(summary.scores[1] >= 60, "mash score {}", summary.scores[1]);
    assert!(summary.scores[2] <= 100);
    assert_eq!(summary.total, summary.scores.iter().sum::<i32>());
    assert_eq!(host.results(), vec![summary]);
    assert_eq!(host.scene_index(), 2);
}

#[tokio::test(start_paused = true)]
async fn same_seed_same_session() {
    let (first, _) = play("steady", 77).await;
    let (second, _) = play("steady", 77).await;
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn recall_scene_tracks_every_turn() {
    let (_, host) = play("novice", 5).await;
    let cube = host.devices().cube.unwrap();
    // 3 + 4 + 5 quarter turns.
    assert_eq!(cube.turns(), 12);
    assert!(!cube.is_visible());
}

#[tokio::test(start_paused = true)]
async fn retry_plays_a_second_round_into_a_score_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    let config = SimConfig::default();
    let host = Arc::new(create_host(&config, "steady", 9).unwrap());
    let store = create_store(&config, Some(&path)).unwrap();
    let mut session = Session::new(
        &config.lineup(),
        host.clone(),
        store.clone(),
        Arc::new(LoggingLeaderboard::new()),
    );

    let first = session.run().await;
    session.retry().await;
    assert_eq!(host.scene_index(), 0);
    let second = session.run().await;

    assert_eq!(session.play_count(), 6);
    assert_eq!(host.results(), vec![first, second.clone()]);
    assert_eq!(store.load("game2Score", -1), second.scores[1]);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["game3Score"], second.scores[2]);
}
