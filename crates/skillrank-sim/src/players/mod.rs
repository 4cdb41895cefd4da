//! Simulated player devices.
//!
//! Each device plays the part of a human at the controls of one mini-game,
//! driven by a [`PlayerProfile`](crate::config::PlayerProfile) section and a
//! seeded RNG so a run can be replayed exactly.

mod circle;
mod recall;
mod reflex;

pub use circle::CircleBot;
pub use recall::RecallBot;
pub use reflex::ReflexBot;

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::Rng;
use tokio::sync::watch;
use tokio::time::Instant;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// `base ± jitter`, uniformly.
fn jittered(rng: &mut SmallRng, base_ms: u64, jitter_ms: u64) -> Duration {
    let spread = jitter_ms.min(base_ms);
    let ms = rng.random_range(base_ms - spread..=base_ms + jitter_ms);
    Duration::from_millis(ms)
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    generation: u64,
    at: Instant,
    choice: Option<usize>,
}

/// Something the player is asked to react to, such as a lit slot or a cube
/// query. Each `raise` starts a new generation; the bot answers each
/// generation at most once.
#[derive(Debug)]
struct Prompt<T> {
    tx: watch::Sender<(u64, Option<T>)>,
    plan: Mutex<Option<Plan>>,
    handled: Mutex<u64>,
}

impl<T: Copy + PartialEq + Send + Sync> Prompt<T> {
    fn new() -> Self {
        let (tx, _) = watch::channel((0, None));
        Self {
            tx,
            plan: Mutex::new(None),
            handled: Mutex::new(0),
        }
    }

    fn raise(&self, subject: T) {
        self.tx.send_modify(|(generation, current)| {
            *generation += 1;
            *current = Some(subject);
        });
    }

    fn clear(&self) {
        self.tx.send_modify(|(_, current)| *current = None);
    }

    fn clear_if(&self, subject: T) {
        self.tx.send_modify(|(_, current)| {
            if *current == Some(subject) {
                *current = None;
            }
        });
    }

    /// Wait for an unanswered prompt and answer it after the planned delay.
    ///
    /// `decide` returns `None` to let a prompt pass, or a delay and a choice.
    /// The plan survives cancellation, so a re-poll resumes the same answer.
    async fn respond(&self, mut decide: impl FnMut(T) -> Option<(Duration, usize)>) -> Option<usize> {
        let mut rx = self.tx.subscribe();
        loop {
            let (generation, current) = *rx.borrow_and_update();
            let fresh = generation > *lock(&self.handled);
            if let (Some(subject), true) = (current, fresh) {
                let plan = {
                    let mut slot = lock(&self.plan);
                    match *slot {
                        Some(plan) if plan.generation == generation => plan,
                        _ => {
                            let decision = decide(subject);
                            let plan = Plan {
                                generation,
                                at: Instant::now() + decision.map(|(d, _)| d).unwrap_or_default(),
                                choice: decision.map(|(_, c)| c),
                            };
                            *slot = Some(plan);
                            plan
                        }
                    }
                };
                match plan.choice {
                    Some(choice) => {
                        tokio::time::sleep_until(plan.at).await;
                        *lock(&self.handled) = generation;
                        return Some(choice);
                    }
                    None => *lock(&self.handled) = generation,
                }
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }
}
