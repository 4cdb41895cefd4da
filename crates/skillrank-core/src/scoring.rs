//! Score formulas for the three mini-games.
//!
//! All functions are pure. Degenerate input yields 0 rather than an error.
//! Rounding is half-to-even throughout, so `2.5` becomes `2` and `3.5`
//! becomes `4`.

use crate::model::Point;

/// Fewer samples than this and a drawing cannot be scored.
pub const MIN_SCORING_SAMPLES: usize = 40;

/// Mean radius below which a shape counts as too small, in surface units.
pub const MIN_MEAN_RADIUS: f64 = 0.5;

/// Floor for the allowed radial deviation.
const MIN_MAX_VARIANCE: f64 = 1.0;

/// Allowed radial deviation as a fraction of the mean radius.
const VARIANCE_RATIO: f64 = 0.1;

/// Bonus points per remaining second of drawing time.
const TIME_BONUS_PER_SEC: f64 = 0.1;

/// Length of the reaction round used to normalise hits.
pub const MASH_ROUND_SECS: f64 = 30.0;

/// Dark gap that follows every acceptance window.
pub const MASH_OFF_GAP_SECS: f64 = 0.5;

/// Per-cycle awards for a correct recall answer, cycles 1..=3.
pub const RECALL_AWARDS: [i32; 3] = [30, 33, 37];

/// Round to the nearest integer, ties to even.
fn round_score(value: f64) -> i32 {
    value.round_ties_even() as i32
}

/// Centroid and mean distance from it. `None` for an empty set.
pub fn radial_profile(points: &[Point]) -> Option<(Point, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let center = Point::new(sx / n, sy / n);
    let mean_radius = points.iter().map(|p| p.distance(&center)).sum::<f64>() / n;
    Some((center, mean_radius))
}

/// Roundness of a drawn shape in [0, 100].
///
/// The mean absolute deviation of each point's radius from the mean radius is
/// compared against 10% of the mean radius (never less than 1.0), which keeps
/// the measure scale-invariant for large shapes without blowing up on tiny ones.
pub fn evaluate_circle_accuracy(points: &[Point]) -> i32 {
    if points.len() < MIN_SCORING_SAMPLES {
        return 0;
    }
    let Some((center, mean_radius)) = radial_profile(points) else {
        return 0;
    };

    let n = points.len() as f64;
    let variance = points
        .iter()
        .map(|p| (p.distance(&center) - mean_radius).abs())
        .sum::<f64>()
        / n;

    let max_variance = (mean_radius * VARIANCE_RATIO).max(MIN_MAX_VARIANCE);
    let score = (100.0 - (variance / max_variance) * 100.0).clamp(0.0, 100.0);
    round_score(score)
}

/// True when the shape's mean radius is under [`MIN_MEAN_RADIUS`].
/// An empty point set is always too small.
pub fn is_shape_too_small(points: &[Point]) -> bool {
    match radial_profile(points) {
        Some((_, mean_radius)) => mean_radius < MIN_MEAN_RADIUS,
        None => true,
    }
}

/// Accuracy plus a bonus for unused time, clamped to [0, 100].
pub fn final_drawing_score(points: &[Point], time_remaining_secs: f64) -> i32 {
    let accuracy = evaluate_circle_accuracy(points);
    let bonus = round_score(time_remaining_secs * TIME_BONUS_PER_SEC);
    (accuracy + bonus).clamp(0, 100)
}

/// Hits normalised against the number of cycles that fit in a round at the
/// final (most decayed) light duration.
///
/// Not clamped: a run that beats the theoretical maximum scores above 100.
pub fn final_mash_score(hits: u32, light_duration_secs: f64) -> i32 {
    let cycle_time = light_duration_secs + MASH_OFF_GAP_SECS;
    let theoretical_max = MASH_ROUND_SECS / cycle_time;
    round_score(100.0 * f64::from(hits) / theoretical_max)
}

/// Points for a correct answer in recall cycle `cycle` (1-based).
///
/// Cycle numbers outside 1..=3 violate the caller's contract; debug builds
/// panic and release builds award nothing.
pub fn recall_cycle_award(cycle: u32) -> i32 {
    debug_assert!(
        (1..=RECALL_AWARDS.len() as u32).contains(&cycle),
        "recall cycle {cycle} out of range"
    );
    cycle
        .checked_sub(1)
        .and_then(|i| RECALL_AWARDS.get(i as usize))
        .copied()
        .unwrap_or(0)
}

/// Award for a finished cycle: the table value when correct, 0 otherwise.
pub fn recall_award_for(cycle: u32, correct: bool) -> i32 {
    if correct {
        recall_cycle_award(cycle)
    } else {
        0
    }
}
