//! Frame clock backed by a tokio interval.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::traits::FrameClock;

/// Default frames per second for hosts that do not pick one.
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Ticks at a fixed frame rate and reports the measured delta per frame.
///
/// Deltas come from `tokio::time::Instant`, so they follow a paused test
/// clock as well as wall time.
pub struct IntervalClock {
    period: Duration,
    state: Mutex<Option<FrameState>>,
}

struct FrameState {
    interval: Interval,
    last: Instant,
}

impl IntervalClock {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1))),
            state: Mutex::new(None),
        }
    }

    pub fn frame_period(&self) -> Duration {
        self.period
    }

    fn fresh_state(&self) -> FrameState {
        let now = Instant::now();
        let mut interval = tokio::time::interval_at(now + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        FrameState {
            interval,
            last: now,
        }
    }
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

#[async_trait]
impl FrameClock for IntervalClock {
    async fn restart(&self) {
        let fresh = self.fresh_state();
        *self.state.lock().await = Some(fresh);
    }

    async fn next_frame(&self) -> Duration {
        let mut guard = self.state.lock().await;
        let state = guard.get_or_insert_with(|| self.fresh_state());
        state.interval.tick().await;
        let now = Instant::now();
        let delta = now.duration_since(state.last);
        state.last = now;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn frames_advance_by_period() {
        let clock = IntervalClock::new(50);
        clock.restart().await;
        let mut total = Duration::ZERO;
        for _ in 0..50 {
            let dt = clock.next_frame().await;
            assert_eq!(dt, Duration::from_millis(20));
            total += dt;
        }
        assert_eq!(total, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_discards_idle_time() {
        let clock = IntervalClock::new(10);
        clock.restart().await;
        clock.next_frame().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        clock.restart().await;
        assert_eq!(clock.next_frame().await, Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_time_counts_without_restart() {
        let clock = IntervalClock::new(10);
        clock.restart().await;
        clock.next_frame().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        let dt = clock.next_frame().await;
        assert!(dt >= Duration::from_secs(1), "got {dt:?}");
    }

    #[test]
    fn zero_frame_rate_falls_back_to_one() {
        assert_eq!(IntervalClock::new(0).frame_period(), Duration::from_secs(1));
    }
}
