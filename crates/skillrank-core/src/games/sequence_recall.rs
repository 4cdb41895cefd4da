//! Remember-the-cube-colors game.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{self, Either};

use crate::error::GameError;
use crate::games::cube::{ColorId, Face, RotationAxis};
use crate::games::MiniGame;
use crate::model::{MiniGameDescriptor, RecallCycle};
use crate::scoring::recall_award_for;
use crate::traits::{Capabilities, FrameClock, RandomSource, RecallDevice, UiPort};

/// Rotate-then-query rounds per play.
pub const CYCLES: u32 = 3;

/// Pause after each turn lands.
const TURN_HOLD: Duration = Duration::from_millis(100);

/// Gap between consecutive turns.
const TURN_SETTLE: Duration = Duration::from_millis(200);

/// How long "Correct"/"Wrong" stays up.
const VERDICT_TIME: Duration = Duration::from_secs(2);

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Quarter turns in a cycle: 3, 4, 5.
pub fn rotation_count(cycle: u32) -> u32 {
    cycle + 2
}

/// Turn speed in quarter turns per second: 1.0, 1.5, 2.0.
pub fn rotation_speed(cycle: u32) -> f64 {
    1.0 + f64::from(cycle.saturating_sub(1)) * 0.5
}

/// Watch a colored cube tumble, then name the color that ended up on one
/// face.
pub struct SequenceRecall {
    descriptor: MiniGameDescriptor,
    clock: Option<Arc<dyn FrameClock>>,
    random: Option<Arc<dyn RandomSource>>,
    cube: Option<Arc<dyn RecallDevice>>,
    initialized: bool,
    cycles: Vec<RecallCycle>,
}

impl SequenceRecall {
    pub fn new(descriptor: MiniGameDescriptor) -> Self {
        Self {
            descriptor,
            clock: None,
            random: None,
            cube: None,
            initialized: false,
            cycles: Vec::new(),
        }
    }

    /// Cycles of the last play.
    pub fn cycles(&self) -> &[RecallCycle] {
        &self.cycles
    }

    /// Whole seconds of think time per query.
    pub fn think_time_secs(&self) -> u32 {
        self.descriptor.duration().as_secs_f64().ceil() as u32
    }

    #[allow(clippy::type_complexity)]
    fn require(
        &self,
    ) -> Result<
        (
            Arc<dyn FrameClock>,
            Arc<dyn RandomSource>,
            Arc<dyn RecallDevice>,
        ),
        GameError,
    > {
        if !self.initialized {
            return Err(GameError::NotInitialized {
                game: self.descriptor.title.clone(),
            });
        }
        let missing = |collaborator: &'static str| GameError::MissingCollaborator {
            game: self.descriptor.title.clone(),
            collaborator,
        };
        let clock = self.clock.clone().ok_or_else(|| missing("frame clock"))?;
        let random = self.random.clone().ok_or_else(|| missing("random source"))?;
        let cube = self.cube.clone().ok_or_else(|| missing("recall cube"))?;
        Ok((clock, random, cube))
    }
}

/// Animate one quarter turn. The last call always carries progress 1.0.
async fn animate_turn(
    clock: &dyn FrameClock,
    cube: &dyn RecallDevice,
    axis: RotationAxis,
    speed: f64,
) {
    clock.restart().await;
    let mut progress = 0.0_f64;
    while progress < 1.0 {
        let dt = clock.next_frame().await;
        progress = (progress + dt.as_secs_f64() * speed).min(1.0);
        cube.rotate(axis, progress);
    }
    tokio::time::sleep(TURN_HOLD).await;
}

/// Tick the timer display from `secs` down to 0, one step per second.
async fn think_countdown(ui: &dyn UiPort, secs: u32) {
    for remaining in (0..=secs).rev() {
        ui.update_timer(f64::from(remaining));
        if remaining > 0 {
            tokio::time::sleep(COUNTDOWN_STEP).await;
        }
    }
}

/// First color choice, or `None` once the think time runs out.
async fn await_choice(ui: &dyn UiPort, cube: &dyn RecallDevice, secs: u32) -> Option<usize> {
    let countdown = think_countdown(ui, secs);
    let choice = async {
        match cube.next_choice().await {
            Some(index) => index,
            None => future::pending().await,
        }
    };
    futures::pin_mut!(countdown, choice);
    match future::select(countdown, choice).await {
        Either::Left(((), _)) => None,
        Either::Right((index, _)) => Some(index),
    }
}

#[async_trait]
impl MiniGame for SequenceRecall {
    fn descriptor(&self) -> &MiniGameDescriptor {
        &self.descriptor
    }

    fn initialize(&mut self, capabilities: &Capabilities) {
        self.clock = Some(capabilities.clock.clone());
        self.random = Some(capabilities.random.clone());
        self.cube = capabilities.cube.clone();
        self.initialized = true;
    }

    async fn play(&mut self, ui: &dyn UiPort) -> Result<i32, GameError> {
        let (clock, random, cube) = self.require()?;
        let think = self.think_time_secs();
        self.cycles.clear();
        let mut score = 0;
        ui.update_score(score);

        for cycle in 1..=CYCLES {
            cube.restore_faces();
            cube.set_visible(true);

            let turns = rotation_count(cycle);
            let speed = rotation_speed(cycle);
            for _ in 0..turns {
                let axis = RotationAxis::ALL[random.pick(RotationAxis::ALL.len())];
                animate_turn(clock.as_ref(), cube.as_ref(), axis, speed).await;
                tokio::time::sleep(TURN_SETTLE).await;
            }

            let sampled = Face::ALL.map(|face| cube.sample_face_color(face));
            let face = Face::ALL[random.pick(Face::ALL.len())];
            let expected = sampled[face.index()];
            tracing::debug!(cycle, turns, speed, %face, ?expected, "querying face");

            ui.set_message(&format!("What color was on the {face} face?"));
            cube.open_answer(face);
            let choice = await_choice(ui, cube.as_ref(), think).await;
            cube.close_answer();

            let chosen = choice.and_then(|index| {
                let color = ColorId::from_index(index);
                if color.is_none() {
                    tracing::warn!(cycle, index, "color choice out of range");
                }
                color
            });
            let correct = expected.is_some() && chosen == expected;
            let award = recall_award_for(cycle, correct);
            score += award;
            ui.update_score(score);

            ui.set_message(if correct { "Correct" } else { "Wrong" });
            tokio::time::sleep(VERDICT_TIME).await;
            ui.set_message("");

            self.cycles.push(RecallCycle {
                cycle,
                rotation_count: turns,
                rotation_speed: speed,
                queried_face: face,
                expected_color: expected,
                chosen_color: chosen,
                correct,
                award,
            });
        }

        cube.set_visible(false);
        tracing::info!(
            game = %self.descriptor.title,
            correct = self.cycles.iter().filter(|c| c.correct).count(),
            score,
            "recall finished"
        );
        Ok(score)
    }
}
