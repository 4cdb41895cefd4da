//! Result aggregation and rank tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::load_records;
use crate::traits::{Leaderboard, ScoreOrder, ScoreStore};

/// Leaderboard the rank score is submitted to.
pub const RANK_BOARD_ID: u32 = 1;

/// Rank tier, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    X,
    S,
    A,
    B,
    C,
    D,
}

/// Inclusive lower bounds on the total score, checked top-down.
const RANK_THRESHOLDS: [(i32, Rank); 5] = [
    (300, Rank::X),
    (270, Rank::S),
    (240, Rank::A),
    (210, Rank::B),
    (180, Rank::C),
];

impl Rank {
    /// Tier for a total score; the first threshold reached wins.
    pub fn from_total(total: i32) -> Rank {
        RANK_THRESHOLDS
            .iter()
            .find(|(min, _)| total >= *min)
            .map(|(_, rank)| *rank)
            .unwrap_or(Rank::D)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::X => "X",
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
        };
        f.write_str(s)
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "X" => Ok(Rank::X),
            "S" => Ok(Rank::S),
            "A" => Ok(Rank::A),
            "B" => Ok(Rank::B),
            "C" => Ok(Rank::C),
            "D" => Ok(Rank::D),
            other => Err(format!("unknown rank: {other}")),
        }
    }
}

/// Everything the results screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Raw stored scores for game 1, 2, 3.
    pub scores: [i32; 3],
    /// The three numbers shown individually: game 2, the game 1/3 average,
    /// game 3.
    pub display: [i32; 3],
    /// Weighted score submitted to the leaderboard.
    pub rank_score: i32,
    /// Plain sum of the three scores; drives the tier.
    pub total: i32,
    pub rank: Rank,
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl ResultSummary {
    /// Aggregate three raw scores.
    ///
    /// Integer arithmetic throughout. Game 3 counts twice in the rank score:
    /// once halved and once in full. Sums are taken in `i64` and saturate at
    /// the `i32` bounds, so scores read from outside cannot overflow.
    pub fn compute(game1: i32, game2: i32, game3: i32) -> Self {
        let [g1, g2, g3] = [game1, game2, game3].map(i64::from);
        let total = saturate(g1 + g2 + g3);
        Self {
            scores: [game1, game2, game3],
            display: [game2, saturate((g1 + g3) / 2), game3],
            rank_score: saturate(g2 + g1 / 2 + g3 / 2 + g3),
            total,
            rank: Rank::from_total(total),
        }
    }

    /// Aggregate whatever the store holds, defaulting absent scores to 0.
    pub fn from_store(store: &dyn ScoreStore) -> Self {
        let [g1, g2, g3] = load_records(store).map(|r| r.value);
        Self::compute(g1, g2, g3)
    }

    /// Report the rank score to the standard leaderboard.
    pub fn submit(&self, leaderboard: &dyn Leaderboard) {
        self.submit_to(leaderboard, RANK_BOARD_ID);
    }

    /// Report the rank score to a specific board.
    pub fn submit_to(&self, leaderboard: &dyn Leaderboard, board_id: u32) {
        tracing::info!(
            board = board_id,
            rank_score = self.rank_score,
            rank = %self.rank,
            "submitting rank score"
        );
        leaderboard.submit(
            board_id,
            f64::from(self.rank_score),
            ScoreOrder::HighScoreDesc,
        );
    }
}
