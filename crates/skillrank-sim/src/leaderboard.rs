//! Leaderboard that logs submissions.

use std::sync::Mutex;

use serde::Serialize;

use skillrank_core::traits::{Leaderboard, ScoreOrder};

/// One accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub board_id: u32,
    pub score: f64,
    pub order: ScoreOrder,
}

/// Records every submission and logs it.
#[derive(Debug, Default)]
pub struct LoggingLeaderboard {
    submissions: Mutex<Vec<Submission>>,
}

impl LoggingLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Best score on a board under its sort order.
    pub fn best(&self, board_id: u32) -> Option<f64> {
        self.submissions()
            .into_iter()
            .filter(|s| s.board_id == board_id)
            .map(|s| match s.order {
                ScoreOrder::HighScoreDesc => s.score,
            })
            .reduce(f64::max)
    }
}

impl Leaderboard for LoggingLeaderboard {
    fn submit(&self, board_id: u32, score: f64, order: ScoreOrder) {
        tracing::info!(board = board_id, score, ?order, "leaderboard submission");
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Submission {
                board_id,
                score,
                order,
            });
    }
}
