//! Core data model types for skillrank.
//!
//! Game descriptors, storage keys, score records, and the per-attempt
//! records each variant produces while it plays.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::games::cube::{ColorId, Face};

/// A point on the drawing surface, in the surface's own units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which mini-game implementation a descriptor selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    AccuracyDraw,
    ReactionMash,
    SequenceRecall,
}

impl GameVariant {
    pub const ALL: [GameVariant; 3] = [
        GameVariant::AccuracyDraw,
        GameVariant::ReactionMash,
        GameVariant::SequenceRecall,
    ];

    /// The fixed storage key this variant's score is saved under.
    pub fn key(self) -> GameKey {
        match self {
            GameVariant::AccuracyDraw => GameKey::Game1,
            GameVariant::ReactionMash => GameKey::Game2,
            GameVariant::SequenceRecall => GameKey::Game3,
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameVariant::AccuracyDraw => write!(f, "accuracy_draw"),
            GameVariant::ReactionMash => write!(f, "reaction_mash"),
            GameVariant::SequenceRecall => write!(f, "sequence_recall"),
        }
    }
}

impl FromStr for GameVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "accuracy_draw" | "draw" | "circle" => Ok(GameVariant::AccuracyDraw),
            "reaction_mash" | "mash" | "buttons" => Ok(GameVariant::ReactionMash),
            "sequence_recall" | "recall" | "cube" => Ok(GameVariant::SequenceRecall),
            other => Err(format!("unknown game variant: {other}")),
        }
    }
}

/// Storage slot for one mini-game's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameKey {
    Game1,
    Game2,
    Game3,
}

impl GameKey {
    pub const ALL: [GameKey; 3] = [GameKey::Game1, GameKey::Game2, GameKey::Game3];

    /// Key string used with the score store.
    pub fn storage_key(self) -> &'static str {
        match self {
            GameKey::Game1 => "game1Score",
            GameKey::Game2 => "game2Score",
            GameKey::Game3 => "game3Score",
        }
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Immutable description of one mini-game in a lineup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniGameDescriptor {
    /// Display name.
    pub title: String,
    /// Nominal time budget in seconds. A hard play cap for drawing and
    /// mashing, the per-cycle think time for recall.
    pub duration_secs: f64,
    /// Implementation selector.
    pub variant: GameVariant,
}

impl MiniGameDescriptor {
    /// The stock descriptor for a variant.
    pub fn standard(variant: GameVariant) -> Self {
        let (title, duration_secs) = match variant {
            GameVariant::AccuracyDraw => ("Draw a perfect circle", 30.0),
            GameVariant::ReactionMash => ("Hit the glowing buttons", 30.0),
            GameVariant::SequenceRecall => ("Remember the cube colors", 10.0),
        };
        Self {
            title: title.to_string(),
            duration_secs,
            variant,
        }
    }

    /// The time budget as a `Duration`. Negative, NaN and unrepresentable
    /// values (such as `inf` from a config file) count as zero.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs.max(0.0)).unwrap_or(Duration::ZERO)
    }

    pub fn key(&self) -> GameKey {
        self.variant.key()
    }
}

/// The default three-game lineup, in play order.
pub fn standard_lineup() -> Vec<MiniGameDescriptor> {
    GameVariant::ALL
        .iter()
        .map(|v| MiniGameDescriptor::standard(*v))
        .collect()
}

/// One persisted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub key: GameKey,
    pub value: i32,
}

/// One lighting cycle of the reaction game.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionEvent {
    /// Slot that was lit.
    pub target_index: usize,
    /// Offset from the start of play when the slot lit.
    pub lit_at: Duration,
    /// Offset from the start of play of the accepted press, if any.
    pub pressed_at: Option<Duration>,
    /// Acceptance window used for this cycle.
    pub light_duration: Duration,
}

impl ReactionEvent {
    pub fn was_hit(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Time between lighting and the accepted press.
    pub fn reaction_time(&self) -> Option<Duration> {
        self.pressed_at.map(|p| p.saturating_sub(self.lit_at))
    }
}

/// One rotate-then-query round of the recall game.
#[derive(Debug, Clone, PartialEq)]
pub struct RecallCycle {
    /// 1-based cycle number.
    pub cycle: u32,
    pub rotation_count: u32,
    pub rotation_speed: f64,
    pub queried_face: Face,
    /// Color sampled from the queried face before blanking.
    pub expected_color: Option<ColorId>,
    /// First color chosen inside the answer window.
    pub chosen_color: Option<ColorId>,
    pub correct: bool,
    /// Points awarded for this cycle.
    pub award: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_display_and_parse() {
        assert_eq!(GameVariant::AccuracyDraw.to_string(), "accuracy_draw");
        assert_eq!(
            "reaction-mash".parse::<GameVariant>().unwrap(),
            GameVariant::ReactionMash
        );
        assert_eq!(
            "Cube".parse::<GameVariant>().unwrap(),
            GameVariant::SequenceRecall
        );
        assert!("tetris".parse::<GameVariant>().is_err());
    }

    #[test]
    fn storage_keys_are_fixed() {
        assert_eq!(GameKey::Game1.storage_key(), "game1Score");
        assert_eq!(GameKey::Game2.storage_key(), "game2Score");
        assert_eq!(GameKey::Game3.storage_key(), "game3Score");
        assert_eq!(GameVariant::SequenceRecall.key(), GameKey::Game3);
    }

    #[test]
    fn standard_lineup_order() {
        let lineup = standard_lineup();
        assert_eq!(lineup.len(), 3);
        assert_eq!(lineup[0].variant, GameVariant::AccuracyDraw);
        assert_eq!(lineup[1].duration(), Duration::from_secs(30));
        assert_eq!(lineup[2].duration(), Duration::from_secs(10));
    }

    #[test]
    fn descriptor_from_toml_like_json() {
        let json = r#"{"title":"Quick circle","duration_secs":15.0,"variant":"accuracy_draw"}"#;
        let d: MiniGameDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.key(), GameKey::Game1);
        assert_eq!(d.duration(), Duration::from_secs(15));
    }

    #[test]
    fn out_of_range_durations_are_zero() {
        let mut d = MiniGameDescriptor::standard(GameVariant::ReactionMash);
        for secs in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, -3.0, 1e300] {
            d.duration_secs = secs;
            assert_eq!(d.duration(), Duration::ZERO, "{secs}");
        }
    }

    #[test]
    fn reaction_time_from_offsets() {
        let event = ReactionEvent {
            target_index: 2,
            lit_at: Duration::from_millis(1500),
            pressed_at: Some(Duration::from_millis(1820)),
            light_duration: Duration::from_millis(900),
        };
        assert!(event.was_hit());
        assert_eq!(event.reaction_time(), Some(Duration::from_millis(320)));
    }
}
