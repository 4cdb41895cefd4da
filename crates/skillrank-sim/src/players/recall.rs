use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use skillrank_core::games::cube::{ColorId, CubeOrientation, Face, RotationAxis};
use skillrank_core::traits::RecallDevice;

use super::{jittered, lock, Prompt};
use crate::config::RecallProfile;

/// A cube on screen and a player trying to keep track of it.
///
/// The bot tracks the true orientation, so face sampling is exact. Whether
/// the player remembers the queried color is a coin flip weighted by the
/// profile's accuracy.
#[derive(Debug)]
pub struct RecallBot {
    profile: RecallProfile,
    rng: Mutex<SmallRng>,
    orientation: Mutex<CubeOrientation>,
    query: Prompt<Face>,
    visible: AtomicBool,
    turns: AtomicU32,
}

impl RecallBot {
    pub fn new(profile: RecallProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
            orientation: Mutex::new(CubeOrientation::default()),
            query: Prompt::new(),
            visible: AtomicBool::new(false),
            turns: AtomicU32::new(0),
        }
    }

    /// Completed quarter turns.
    pub fn turns(&self) -> u32 {
        self.turns.load(Ordering::Relaxed)
    }

    pub fn orientation(&self) -> CubeOrientation {
        *lock(&self.orientation)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecallDevice for RecallBot {
    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Relaxed);
    }

    fn restore_faces(&self) {
        tracing::trace!("cube faces repainted");
    }

    fn rotate(&self, axis: RotationAxis, progress: f64) {
        if progress >= 1.0 {
            lock(&self.orientation).rotate(axis);
            self.turns.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(?axis, "quarter turn landed");
        }
    }

    fn sample_face_color(&self, face: Face) -> Option<ColorId> {
        Some(lock(&self.orientation).color_at(face))
    }

    fn open_answer(&self, face: Face) {
        self.query.raise(face);
    }

    fn close_answer(&self) {
        self.query.clear();
    }

    async fn next_choice(&self) -> Option<usize> {
        self.query
            .respond(|face| {
                let truth = lock(&self.orientation).color_at(face);
                let mut rng = lock(&self.rng);
                let delay = jittered(
                    &mut rng,
                    self.profile.answer_delay_ms,
                    self.profile.jitter_ms,
                );
                let color = if rng.random_bool(self.profile.accuracy.clamp(0.0, 1.0)) {
                    truth
                } else {
                    let offset = rng.random_range(1..ColorId::ALL.len());
                    ColorId::ALL[(truth.index() + offset) % ColorId::ALL.len()]
                };
                Some((delay, color.index()))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sharp() -> RecallProfile {
        RecallProfile {
            accuracy: 1.0,
            answer_delay_ms: 1_000,
            jitter_ms: 0,
        }
    }

    #[test]
    fn only_finished_turns_count() {
        let bot = RecallBot::new(sharp(), 1);
        bot.rotate(RotationAxis::PositiveX, 0.5);
        assert_eq!(bot.turns(), 0);
        assert_eq!(bot.orientation(), CubeOrientation::default());
        bot.rotate(RotationAxis::PositiveX, 1.0);
        assert_eq!(bot.turns(), 1);
        assert_ne!(bot.orientation(), CubeOrientation::default());
    }

    #[tokio::test(start_paused = true)]
    async fn sharp_player_names_the_true_color() {
        let bot = RecallBot::new(sharp(), 2);
        bot.rotate(RotationAxis::PositiveY, 1.0);
        bot.rotate(RotationAxis::NegativeZ, 1.0);
        let truth = bot.sample_face_color(Face::Top).unwrap();

        bot.open_answer(Face::Top);
        assert_eq!(bot.next_choice().await, Some(truth.index()));
    }

    #[tokio::test(start_paused = true)]
    async fn forgetful_player_names_another_color() {
        let bot = RecallBot::new(
            RecallProfile {
                accuracy: 0.0,
                ..sharp()
            },
            3,
        );
        let truth = bot.sample_face_color(Face::Left).unwrap();
        bot.open_answer(Face::Left);
        let choice = bot.next_choice().await.unwrap();
        assert_ne!(choice, truth.index());
        assert!(choice < ColorId::ALL.len());
    }

    #[tokio::test(start_paused = true)]
    async fn no_answer_once_closed() {
        let bot = RecallBot::new(sharp(), 4);
        bot.open_answer(Face::Front);
        bot.close_answer();
        let choice = tokio::time::timeout(Duration::from_secs(5), bot.next_choice()).await;
        assert!(choice.is_err());
    }
}
