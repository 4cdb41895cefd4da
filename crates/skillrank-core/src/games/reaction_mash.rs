//! Hit-the-glowing-button game.
//!
//! Two loops share one task: a scoring loop that ticks frames for the fixed
//! round length, and a lighting scheduler that lights random slots with a
//! shrinking acceptance window. The scheduler is dropped as soon as the
//! scoring loop runs out of time.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::GameError;
use crate::games::MiniGame;
use crate::model::{MiniGameDescriptor, ReactionEvent};
use crate::scoring::{final_mash_score, MASH_OFF_GAP_SECS};
use crate::traits::{Capabilities, FrameClock, MashPad, RandomSource, SlotLight, UiPort};

/// Acceptance window of the first cycle.
pub const INITIAL_LIGHT: Duration = Duration::from_millis(1000);

/// Amount the window shrinks after every cycle.
pub const LIGHT_STEP: Duration = Duration::from_millis(100);

/// The window never shrinks below this.
pub const MIN_LIGHT: Duration = Duration::from_millis(500);

/// State shared by the scoring loop and the lighting scheduler.
struct MashState {
    hits: AtomicU32,
    light_ms: AtomicU64,
    events: Mutex<Vec<ReactionEvent>>,
    shown: Mutex<Option<usize>>,
    started: Instant,
}

impl MashState {
    fn new() -> Self {
        Self {
            hits: AtomicU32::new(0),
            light_ms: AtomicU64::new(INITIAL_LIGHT.as_millis() as u64),
            events: Mutex::new(Vec::new()),
            shown: Mutex::new(None),
            started: Instant::now(),
        }
    }

    fn light(&self) -> Duration {
        Duration::from_millis(self.light_ms.load(Ordering::Relaxed))
    }

    fn shrink_light(&self) {
        let next = self.light().saturating_sub(LIGHT_STEP).max(MIN_LIGHT);
        self.light_ms.store(next.as_millis() as u64, Ordering::Relaxed);
    }

    fn set_shown(&self, slot: Option<usize>) {
        *self.shown.lock().unwrap_or_else(|e| e.into_inner()) = slot;
    }

    fn record_press(&self) {
        let now = self.started.elapsed();
        self.hits.fetch_add(1, Ordering::Relaxed);
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(last) = events.last_mut() {
            last.pressed_at = Some(now);
        }
    }
}

/// Press each slot while it glows. Late hits are worth more: the score is
/// normalised against the shortest window reached.
pub struct ReactionMash {
    descriptor: MiniGameDescriptor,
    clock: Option<Arc<dyn FrameClock>>,
    random: Option<Arc<dyn RandomSource>>,
    pad: Option<Arc<dyn MashPad>>,
    initialized: bool,
    hits: u32,
    light: Duration,
    events: Vec<ReactionEvent>,
}

impl ReactionMash {
    pub fn new(descriptor: MiniGameDescriptor) -> Self {
        Self {
            descriptor,
            clock: None,
            random: None,
            pad: None,
            initialized: false,
            hits: 0,
            light: INITIAL_LIGHT,
            events: Vec::new(),
        }
    }

    /// Accepted presses in the last play.
    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// Acceptance window in effect when the last play ended.
    pub fn light_duration(&self) -> Duration {
        self.light
    }

    /// Every lighting cycle of the last play, including one cut short by the
    /// end of the round.
    pub fn events(&self) -> &[ReactionEvent] {
        &self.events
    }

    #[allow(clippy::type_complexity)]
    fn require(
        &self,
    ) -> Result<(Arc<dyn FrameClock>, Arc<dyn RandomSource>, Arc<dyn MashPad>), GameError> {
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
        let pad = self.pad.clone().ok_or_else(|| missing("button pad"))?;
        Ok((clock, random, pad))
    }
}

/// Light random slots until dropped.
async fn run_lighting(state: &MashState, pad: &dyn MashPad, random: &dyn RandomSource) {
    let slots = pad.slot_count();
    if slots == 0 {
        tracing::warn!("button pad has no slots; nothing will light");
        return std::future::pending().await;
    }
    let gap = Duration::from_secs_f64(MASH_OFF_GAP_SECS);

    loop {
        let target = random.pick(slots);
        let window = state.light();
        pad.set_slot(target, SlotLight::Lit);
        state.set_shown(Some(target));
        state
            .events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ReactionEvent {
                target_index: target,
                lit_at: state.started.elapsed(),
                pressed_at: None,
                light_duration: window,
            });
        tracing::debug!(slot = target, window_ms = window.as_millis() as u64, "slot lit");

        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);
        let mut accepted = false;
        loop {
            tokio::select! {
                biased;
                _ = &mut deadline => break,
                press = pad.next_press() => match press {
                    Some(slot) if slot == target && !accepted => {
                        accepted = true;
                        state.record_press();
                        pad.set_slot(target, SlotLight::Accepted);
                    }
                    Some(_) => {}
                    None => {
                        (&mut deadline).await;
                        break;
                    }
                },
            }
        }

        if accepted {
            pad.set_slot(target, SlotLight::Off);
            state.set_shown(None);
        } else {
            pad.set_slot(target, SlotLight::Missed);
        }

        tokio::time::sleep(gap).await;
        if !accepted {
            pad.set_slot(target, SlotLight::Off);
            state.set_shown(None);
        }
        state.shrink_light();
    }
}

#[async_trait]
impl MiniGame for ReactionMash {
    fn descriptor(&self) -> &MiniGameDescriptor {
        &self.descriptor
    }

    fn initialize(&mut self, capabilities: &Capabilities) {
        self.clock = Some(capabilities.clock.clone());
        self.random = Some(capabilities.random.clone());
        self.pad = capabilities.pad.clone();
        self.initialized = true;
    }

    async fn play(&mut self, ui: &dyn UiPort) -> Result<i32, GameError> {
        let (clock, random, pad) = self.require()?;

        pad.set_active(true);
        clock.restart().await;
        let state = MashState::new();
        let round = self.descriptor.duration().as_secs_f64();

        let scoring = async {
            let mut remaining = round;
            while remaining > 0.0 {
                let dt = clock.next_frame().await;
                remaining -= dt.as_secs_f64();
                ui.update_timer(remaining.max(0.0));
                ui.update_score(state.hits.load(Ordering::Relaxed) as i32);
            }
        };
        let lighting = run_lighting(&state, pad.as_ref(), random.as_ref());
        tokio::pin!(scoring);
        tokio::pin!(lighting);

        tokio::select! {
            biased;
            _ = &mut scoring => {}
            _ = &mut lighting => {}
        }

        if let Some(slot) = *state.shown.lock().unwrap_or_else(|e| e.into_inner()) {
            pad.set_slot(slot, SlotLight::Off);
        }
        pad.set_active(false);

        self.hits = state.hits.load(Ordering::Relaxed);
        self.light = state.light();
        self.events = std::mem::take(&mut *state.events.lock().unwrap_or_else(|e| e.into_inner()));

        let score = final_mash_score(self.hits, self.light.as_secs_f64());
        tracing::info!(
            game = %self.descriptor.title,
            hits = self.hits,
            cycles = self.events.len(),
            light_ms = self.light.as_millis() as u64,
            score,
            "reaction round finished"
        );
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::IntervalClock;
    use crate::mock::{RecordingUi, ReflexPad, ScriptedRandom};
    use crate::model::GameVariant;

    fn game_with(pad: Arc<ReflexPad>) -> ReactionMash {
        let caps = Capabilities::new(
            Arc::new(IntervalClock::default()),
            Arc::new(ScriptedRandom::new([0, 3, 5, 2, 7, 1])),
        )
        .with_pad(pad);
        let mut game = ReactionMash::new(MiniGameDescriptor::standard(GameVariant::ReactionMash));
        game.initialize(&caps);
        game
    }

    #[test]
    fn light_shrinks_to_floor() {
        let state = MashState::new();
        let mut seen = vec![state.light()];
        for _ in 0..8 {
            state.shrink_light();
            seen.push(state.light());
        }
        assert_eq!(seen[1], Duration::from_millis(900));
        assert_eq!(seen[5], MIN_LIGHT);
        assert_eq!(seen[8], MIN_LIGHT);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_pad_is_reported() {
        let caps = Capabilities::new(
            Arc::new(IntervalClock::default()),
            Arc::new(ScriptedRandom::default()),
        );
        let mut game = ReactionMash::new(MiniGameDescriptor::standard(GameVariant::ReactionMash));
        game.initialize(&caps);
        let err = game.play(&RecordingUi::auto_start()).await.unwrap_err();
        assert!(matches!(
            err,
            GameError::MissingCollaborator { collaborator: "button pad", .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn quick_player_hits_every_cycle() {
        let pad = Arc::new(ReflexPad::new(9, Some(Duration::from_millis(200))));
        let mut game = game_with(pad.clone());
        let ui = RecordingUi::auto_start();

        let score = game.play(&ui).await.unwrap();

        // Cycles start at 0, 1.5, 2.9, 4.2, 5.4, then every second from 6.5
        // through 29.5: 29 cycles, all hit.
        assert_eq!(game.hits(), 29);
        assert_eq!(game.events().len(), 29);
        assert!(game.events().iter().all(|e| e.was_hit()));
        assert_eq!(
            game.events()[0].reaction_time(),
            Some(Duration::from_millis(200))
        );
        assert_eq!(game.light_duration(), MIN_LIGHT);
        assert_eq!(score, final_mash_score(29, 0.5));
        assert_eq!(score, 97);
        assert_eq!(ui.last_score(), Some(29));
        assert_eq!(pad.active_history(), vec![true, false]);
        assert!(pad.lights().contains(&(3, SlotLight::Accepted)));
        assert!(!pad.lights().contains(&(0, SlotLight::Missed)));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_player_misses_everything() {
        let pad = Arc::new(ReflexPad::new(9, None));
        let mut game = game_with(pad.clone());

        let score = game.play(&RecordingUi::auto_start()).await.unwrap();

        assert_eq!(score, 0);
        assert_eq!(game.hits(), 0);
        assert_eq!(game.events().len(), 29);
        assert!(game.events().iter().all(|e| !e.was_hit()));
        assert_eq!(game.events()[1].light_duration, Duration::from_millis(900));
        assert!(pad.lights().contains(&(0, SlotLight::Missed)));
        let lit = pad
            .lights()
            .iter()
            .filter(|(_, light)| *light == SlotLight::Lit)
            .count();
        assert_eq!(lit, 29);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_player_never_beats_the_window() {
        // 1.2s is longer than even the first window.
        let pad = Arc::new(ReflexPad::new(4, Some(Duration::from_millis(1200))));
        let mut game = game_with(pad);

        let score = game.play(&RecordingUi::auto_start()).await.unwrap();
        assert_eq!(game.hits(), 0);
        assert_eq!(score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn infinite_budget_ends_at_once() {
        let pad = Arc::new(ReflexPad::new(9, Some(Duration::from_millis(200))));
        let caps = Capabilities::new(
            Arc::new(IntervalClock::default()),
            Arc::new(ScriptedRandom::default()),
        )
        .with_pad(pad);
        let mut descriptor = MiniGameDescriptor::standard(GameVariant::ReactionMash);
        descriptor.duration_secs = f64::INFINITY;
        let mut game = ReactionMash::new(descriptor);
        game.initialize(&caps);

        let start = Instant::now();
        let score = game.play(&RecordingUi::auto_start()).await.unwrap();
        assert_eq!(score, 0);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_pad_lights_nothing() {
        let pad = Arc::new(ReflexPad::new(0, Some(Duration::from_millis(100))));
        let mut game = game_with(pad.clone());

        let score = game.play(&RecordingUi::auto_start()).await.unwrap();
        assert_eq!(score, 0);
        assert!(game.events().is_empty());
        assert!(pad.lights().is_empty());
        assert_eq!(game.light_duration(), INITIAL_LIGHT);
    }
}
