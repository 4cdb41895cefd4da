use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

use skillrank_core::model::Point;
use skillrank_core::traits::{DrawingSurface, SurfaceEvent};

use super::lock;
use crate::config::DrawProfile;

#[derive(Debug, Default)]
struct StrokeState {
    enabled_at: Option<Instant>,
    stroke: Vec<Point>,
    emitted: usize,
    released: bool,
    rendered: usize,
}

/// Traces one hand-drawn circle per enable, spread over the profile's
/// stroke time.
#[derive(Debug)]
pub struct CircleBot {
    profile: DrawProfile,
    rng: Mutex<SmallRng>,
    state: Mutex<StrokeState>,
}

impl CircleBot {
    pub fn new(profile: DrawProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
            state: Mutex::new(StrokeState::default()),
        }
    }

    /// Points of the stroke being traced.
    pub fn stroke(&self) -> Vec<Point> {
        lock(&self.state).stroke.clone()
    }

    /// Length of the last stroke the game rendered.
    pub fn rendered_len(&self) -> usize {
        lock(&self.state).rendered
    }

    fn trace(&self) -> Vec<Point> {
        let mut rng = lock(&self.rng);
        let n = self.profile.points;
        let center = Point::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        let start = rng.random_range(0.0..std::f64::consts::TAU);
        let phase = rng.random_range(0.0..std::f64::consts::TAU);
        (0..n)
            .map(|i| {
                let a = start + std::f64::consts::TAU * i as f64 / n.max(1) as f64;
                // Slow lopsidedness plus per-sample tremor.
                let drift = (3.0 * a + phase).sin();
                let tremor: f64 = rng.random_range(-1.0..1.0);
                let r = self.profile.radius * (1.0 + self.profile.wobble * (0.5 * drift + 0.5 * tremor));
                Point::new(center.x + r * a.cos(), center.y + r * a.sin())
            })
            .collect()
    }
}

impl DrawingSurface for CircleBot {
    fn set_enabled(&self, enabled: bool) {
        let stroke = if enabled { self.trace() } else { Vec::new() };
        let mut state = lock(&self.state);
        if enabled {
            *state = StrokeState {
                enabled_at: Some(Instant::now()),
                stroke,
                ..StrokeState::default()
            };
        } else {
            state.enabled_at = None;
        }
    }

    fn drain_input(&self) -> Vec<SurfaceEvent> {
        let mut state = lock(&self.state);
        let Some(enabled_at) = state.enabled_at else {
            return Vec::new();
        };
        if state.released {
            return Vec::new();
        }
        let elapsed = enabled_at.elapsed();
        let delay = Duration::from_millis(self.profile.start_delay_ms);
        if elapsed < delay {
            return Vec::new();
        }

        let total = state.stroke.len();
        let stroke_time = Duration::from_millis(self.profile.stroke_ms.max(1));
        let progress = ((elapsed - delay).as_secs_f64() / stroke_time.as_secs_f64()).min(1.0);
        let due = ((progress * total as f64).ceil() as usize).min(total);

        let mut events: Vec<SurfaceEvent> = state.stroke[state.emitted..due]
            .iter()
            .map(|p| SurfaceEvent::Drag(*p))
            .collect();
        state.emitted = due;
        if due == total {
            events.push(SurfaceEvent::Release);
            state.released = true;
        }
        events
    }

    fn render_stroke(&self, points: &[Point]) {
        lock(&self.state).rendered = points.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillrank_core::scoring::evaluate_circle_accuracy;

    fn profile() -> DrawProfile {
        DrawProfile {
            start_delay_ms: 500,
            stroke_ms: 2_000,
            radius: 3.0,
            wobble: 0.05,
            points: 150,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_before_enable_or_delay() {
        let bot = CircleBot::new(profile(), 1);
        assert!(bot.drain_input().is_empty());
        bot.set_enabled(true);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(bot.drain_input().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stroke_is_spread_over_time_then_released() {
        let bot = CircleBot::new(profile(), 2);
        bot.set_enabled(true);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        let half = bot.drain_input();
        assert_eq!(half.len(), 75);
        assert!(!half.contains(&SurfaceEvent::Release));

        tokio::time::sleep(Duration::from_secs(2)).await;
        let rest = bot.drain_input();
        assert_eq!(rest.len(), 76);
        assert_eq!(rest.last(), Some(&SurfaceEvent::Release));
        assert!(bot.drain_input().is_empty());
    }

    #[test]
    fn same_seed_same_stroke() {
        let a = CircleBot::new(profile(), 9);
        let b = CircleBot::new(profile(), 9);
        assert_eq!(a.trace(), b.trace());
    }

    #[test]
    fn steady_hand_draws_a_good_circle() {
        let bot = CircleBot::new(profile(), 3);
        let stroke = bot.trace();
        assert_eq!(stroke.len(), 150);
        assert!(evaluate_circle_accuracy(&stroke) >= 85);
    }

    #[test]
    fn shaky_hand_scores_lower() {
        let steady = CircleBot::new(profile(), 4).trace();
        let shaky = CircleBot::new(
            DrawProfile {
                wobble: 0.4,
                ..profile()
            },
            4,
        )
        .trace();
        assert!(evaluate_circle_accuracy(&shaky) < evaluate_circle_accuracy(&steady));
    }
}
