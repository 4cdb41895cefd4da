//! Recording and scripted collaborators for tests.
//!
//! These doubles implement every port with deterministic behavior so the
//! session and the mini-games can be driven on a paused tokio clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::games::cube::{ColorId, CubeOrientation, Face, RotationAxis};
use crate::model::Point;
use crate::results::ResultSummary;
use crate::signal::SignalLatch;
use crate::traits::{
    Bindings, CountdownStep, DrawingSurface, Leaderboard, MashPad, RandomSource, RecallDevice,
    SceneHost, ScoreOrder, SlotLight, SurfaceEvent, UiPort,
};

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// UI
// ---------------------------------------------------------------------------

/// Everything a [`RecordingUi`] was asked to show.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Title {
        title: String,
        position: usize,
        total: usize,
    },
    Timer(f64),
    Score(i32),
    Message(String),
    Countdown(CountdownStep),
    StartRequested,
}

/// UI port that records calls and presses its own start button on request.
#[derive(Debug)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
    start: SignalLatch,
    auto_start: bool,
}

impl RecordingUi {
    /// A UI whose start button is pressed as soon as it is shown.
    pub fn auto_start() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            start: SignalLatch::new(),
            auto_start: true,
        }
    }

    /// A UI whose start button must be pressed via [`RecordingUi::press_start`].
    pub fn manual_start() -> Self {
        Self {
            auto_start: false,
            ..Self::auto_start()
        }
    }

    /// Press the start button. Returns `false` if no wait was pending.
    pub fn press_start(&self) -> bool {
        self.start.resolve()
    }

    pub fn is_waiting_for_start(&self) -> bool {
        self.start.is_armed()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        lock(&self.events).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                UiEvent::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn titles(&self) -> Vec<(String, usize, usize)> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                UiEvent::Title {
                    title,
                    position,
                    total,
                } => Some((title.clone(), *position, *total)),
                _ => None,
            })
            .collect()
    }

    pub fn last_score(&self) -> Option<i32> {
        lock(&self.events).iter().rev().find_map(|e| match e {
            UiEvent::Score(s) => Some(*s),
            _ => None,
        })
    }

    pub fn timers(&self) -> Vec<f64> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                UiEvent::Timer(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: UiEvent) {
        lock(&self.events).push(event);
    }
}

#[async_trait]
impl UiPort for RecordingUi {
    fn show_title(&self, title: &str, position: usize, total: usize) {
        self.record(UiEvent::Title {
            title: title.to_string(),
            position,
            total,
        });
    }

    fn update_timer(&self, seconds_remaining: f64) {
        self.record(UiEvent::Timer(seconds_remaining));
    }

    fn update_score(&self, value: i32) {
        self.record(UiEvent::Score(value));
    }

    fn set_message(&self, text: &str) {
        self.record(UiEvent::Message(text.to_string()));
    }

    fn show_countdown_step(&self, step: CountdownStep) {
        self.record(UiEvent::Countdown(step));
    }

    async fn await_start_signal(&self) {
        self.record(UiEvent::StartRequested);
        let wait = self.start.arm();
        if self.auto_start {
            self.start.resolve();
        }
        wait.wait().await;
    }
}

// ---------------------------------------------------------------------------
// Leaderboard and randomness
// ---------------------------------------------------------------------------

/// Leaderboard that keeps every submission.
#[derive(Debug, Default)]
pub struct RecordingLeaderboard {
    submissions: Mutex<Vec<(u32, f64, ScoreOrder)>>,
}

impl RecordingLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<(u32, f64, ScoreOrder)> {
        lock(&self.submissions).clone()
    }
}

impl Leaderboard for RecordingLeaderboard {
    fn submit(&self, board_id: u32, score: f64, order: ScoreOrder) {
        lock(&self.submissions).push((board_id, score, order));
    }
}

/// Returns queued picks in order (reduced modulo `upper`), then 0.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    picks: Mutex<VecDeque<usize>>,
}

impl ScriptedRandom {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: Mutex::new(picks.into_iter().collect()),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&self, upper: usize) -> usize {
        let next = lock(&self.picks).pop_front().unwrap_or(0);
        next % upper.max(1)
    }
}

// ---------------------------------------------------------------------------
// Drawing surface
// ---------------------------------------------------------------------------

/// Surface that hands out one queued batch of events per drain.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    batches: Mutex<VecDeque<Vec<SurfaceEvent>>>,
    enabled: Mutex<Vec<bool>>,
    rendered: Mutex<usize>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch for a future drain.
    pub fn push_batch(&self, batch: Vec<SurfaceEvent>) {
        lock(&self.batches).push_back(batch);
    }

    /// Queue a full stroke (every point then a release) as one batch.
    pub fn push_stroke(&self, points: &[Point]) {
        let mut batch: Vec<SurfaceEvent> = points.iter().map(|p| SurfaceEvent::Drag(*p)).collect();
        batch.push(SurfaceEvent::Release);
        self.push_batch(batch);
    }

    /// Queue an empty batch, i.e. a frame with no input.
    pub fn push_idle(&self, frames: usize) {
        for _ in 0..frames {
            self.push_batch(Vec::new());
        }
    }

    pub fn enabled_history(&self) -> Vec<bool> {
        lock(&self.enabled).clone()
    }

    /// Length of the most recently rendered stroke.
    pub fn rendered_len(&self) -> usize {
        *lock(&self.rendered)
    }
}

impl DrawingSurface for ScriptedSurface {
    fn set_enabled(&self, enabled: bool) {
        lock(&self.enabled).push(enabled);
    }

    fn drain_input(&self) -> Vec<SurfaceEvent> {
        lock(&self.batches).pop_front().unwrap_or_default()
    }

    fn render_stroke(&self, points: &[Point]) {
        *lock(&self.rendered) = points.len();
    }
}

// ---------------------------------------------------------------------------
// Button pad
// ---------------------------------------------------------------------------

/// Pad that presses each newly lit slot after a fixed reaction time.
#[derive(Debug)]
pub struct ReflexPad {
    slots: usize,
    reaction: Option<Duration>,
    lit: watch::Sender<(u64, Option<usize>)>,
    last_pressed: Mutex<u64>,
    lights: Mutex<Vec<(usize, SlotLight)>>,
    active: Mutex<Vec<bool>>,
}

impl ReflexPad {
    /// `reaction = None` never presses anything.
    pub fn new(slots: usize, reaction: Option<Duration>) -> Self {
        let (lit, _) = watch::channel((0, None));
        Self {
            slots,
            reaction,
            lit,
            last_pressed: Mutex::new(0),
            lights: Mutex::new(Vec::new()),
            active: Mutex::new(Vec::new()),
        }
    }

    pub fn lights(&self) -> Vec<(usize, SlotLight)> {
        lock(&self.lights).clone()
    }

    pub fn active_history(&self) -> Vec<bool> {
        lock(&self.active).clone()
    }
}

#[async_trait]
impl MashPad for ReflexPad {
    fn slot_count(&self) -> usize {
        self.slots
    }

    fn set_active(&self, active: bool) {
        lock(&self.active).push(active);
    }

    fn set_slot(&self, slot: usize, light: SlotLight) {
        lock(&self.lights).push((slot, light));
        self.lit.send_modify(|(generation, current)| {
            if light == SlotLight::Lit {
                *generation += 1;
                *current = Some(slot);
            } else if *current == Some(slot) && light != SlotLight::Accepted {
                *current = None;
            }
        });
    }

    async fn next_press(&self) -> Option<usize> {
        let Some(reaction) = self.reaction else {
            return std::future::pending().await;
        };
        let mut rx = self.lit.subscribe();
        loop {
            let (generation, current) = *rx.borrow_and_update();
            let already = *lock(&self.last_pressed);
            if let Some(slot) = current {
                if generation > already {
                    tokio::time::sleep(reaction).await;
                    *lock(&self.last_pressed) = generation;
                    return Some(slot);
                }
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Recall device
// ---------------------------------------------------------------------------

/// How a [`ScriptedCube`] answers one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeAnswer {
    /// The color actually showing on the queried face.
    Correct,
    /// Any other palette color.
    Wrong,
    /// A raw button index, possibly out of range.
    Index(usize),
    /// No answer at all.
    Silent,
}

/// Recall device backed by a real [`CubeOrientation`].
#[derive(Debug)]
pub struct ScriptedCube {
    orientation: Mutex<CubeOrientation>,
    answers: Mutex<VecDeque<CubeAnswer>>,
    delay: Duration,
    query: watch::Sender<(u64, Option<Face>)>,
    answered: Mutex<u64>,
    turns: Mutex<Vec<RotationAxis>>,
    queries: Mutex<Vec<Face>>,
}

impl ScriptedCube {
    /// Answers are consumed one per query; once exhausted the cube is silent.
    pub fn new(answers: impl IntoIterator<Item = CubeAnswer>, delay: Duration) -> Self {
        let (query, _) = watch::channel((0, None));
        Self {
            orientation: Mutex::new(CubeOrientation::default()),
            answers: Mutex::new(answers.into_iter().collect()),
            delay,
            query,
            answered: Mutex::new(0),
            turns: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Completed quarter turns, in order.
    pub fn turns(&self) -> Vec<RotationAxis> {
        lock(&self.turns).clone()
    }

    pub fn queries(&self) -> Vec<Face> {
        lock(&self.queries).clone()
    }

    fn choose(&self, face: Face, answer: CubeAnswer) -> Option<usize> {
        let truth = lock(&self.orientation).color_at(face);
        match answer {
            CubeAnswer::Correct => Some(truth.index()),
            CubeAnswer::Wrong => Some((truth.index() + 1) % ColorId::ALL.len()),
            CubeAnswer::Index(i) => Some(i),
            CubeAnswer::Silent => None,
        }
    }
}

#[async_trait]
impl RecallDevice for ScriptedCube {
    fn set_visible(&self, _visible: bool) {}

    fn restore_faces(&self) {}

    fn rotate(&self, axis: RotationAxis, progress: f64) {
        if progress >= 1.0 {
            lock(&self.orientation).rotate(axis);
            lock(&self.turns).push(axis);
        }
    }

    fn sample_face_color(&self, face: Face) -> Option<ColorId> {
        Some(lock(&self.orientation).color_at(face))
    }

    fn open_answer(&self, face: Face) {
        lock(&self.queries).push(face);
        self.query.send_modify(|(generation, current)| {
            *generation += 1;
            *current = Some(face);
        });
    }

    fn close_answer(&self) {
        self.query.send_modify(|(_, current)| *current = None);
    }

    async fn next_choice(&self) -> Option<usize> {
        let mut rx = self.query.subscribe();
        loop {
            let (generation, current) = *rx.borrow_and_update();
            let already = *lock(&self.answered);
            if let Some(face) = current {
                if generation > already {
                    *lock(&self.answered) = generation;
                    let answer = lock(&self.answers)
                        .pop_front()
                        .unwrap_or(CubeAnswer::Silent);
                    if let Some(choice) = self.choose(face, answer) {
                        tokio::time::sleep(self.delay).await;
                        return Some(choice);
                    }
                }
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scene host
// ---------------------------------------------------------------------------

type BindingFactory = Box<dyn Fn(usize) -> Bindings + Send + Sync>;

/// Scene host that builds fresh bindings per scene from a factory.
pub struct MockHost {
    factory: BindingFactory,
    current: Mutex<Bindings>,
    loads: Mutex<Vec<usize>>,
    results: Mutex<Vec<ResultSummary>>,
    binds: AtomicU32,
}

impl MockHost {
    /// Scene 0 is bound immediately; each load builds the next scene's ports.
    pub fn new(factory: impl Fn(usize) -> Bindings + Send + Sync + 'static) -> Self {
        let first = factory(0);
        Self {
            factory: Box::new(factory),
            current: Mutex::new(first),
            loads: Mutex::new(Vec::new()),
            results: Mutex::new(Vec::new()),
            binds: AtomicU32::new(0),
        }
    }

    /// Same bindings for every scene.
    pub fn fixed(bindings: Bindings) -> Self {
        Self::new(move |_| bindings.clone())
    }

    /// Scene indices loaded so far.
    pub fn loads(&self) -> Vec<usize> {
        lock(&self.loads).clone()
    }

    pub fn results(&self) -> Vec<ResultSummary> {
        lock(&self.results).clone()
    }

    /// How many times the bindings were read.
    pub fn bind_count(&self) -> u32 {
        self.binds.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SceneHost for MockHost {
    fn bindings(&self) -> Bindings {
        self.binds.fetch_add(1, Ordering::Relaxed);
        lock(&self.current).clone()
    }

    async fn load_game_scene(&self, index: usize) {
        lock(&self.loads).push(index);
        let next = (self.factory)(index);
        *lock(&self.current) = next;
    }

    fn show_results(&self, summary: &ResultSummary) {
        lock(&self.results).push(summary.clone());
    }
}

/// Convenience for tests that only need a shared handle.
pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
