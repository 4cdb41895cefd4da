//! Collaborator ports.
//!
//! Everything the engine needs from the outside world (display, input
//! devices, timing, randomness, storage, leaderboard, scene switching) comes
//! through these traits. Hosts implement them; the engine never looks
//! collaborators up on its own.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::games::cube::{ColorId, Face, RotationAxis};
use crate::model::Point;
use crate::results::ResultSummary;

// ---------------------------------------------------------------------------
// UI port
// ---------------------------------------------------------------------------

/// What the countdown display should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// A remaining-step number.
    Count(u32),
    /// The "START" flash.
    Start,
    /// Countdown display hidden.
    Hidden,
}

/// Display surface for titles, timers, scores, and the start button.
#[async_trait]
pub trait UiPort: Send + Sync {
    /// Show a game title and its 1-based position in the lineup.
    fn show_title(&self, title: &str, position: usize, total: usize);

    /// Update the remaining-time display.
    fn update_timer(&self, seconds_remaining: f64);

    /// Update the live score display.
    fn update_score(&self, value: i32);

    /// Set the transient message line. An empty string clears it.
    fn set_message(&self, text: &str);

    /// Render one countdown step.
    fn show_countdown_step(&self, step: CountdownStep);

    /// Suspend until the start button is pressed. Each call must wait on a
    /// fresh single-resolution signal.
    async fn await_start_signal(&self);

    /// Count down from `from` to 1, one `step` each, then flash START for one
    /// more step.
    async fn show_countdown(&self, from: u32, step: Duration) {
        for n in (1..=from).rev() {
            self.show_countdown_step(CountdownStep::Count(n));
            tokio::time::sleep(step).await;
        }
        self.show_countdown_step(CountdownStep::Start);
        tokio::time::sleep(step).await;
        self.show_countdown_step(CountdownStep::Hidden);
    }
}

// ---------------------------------------------------------------------------
// Timing and randomness
// ---------------------------------------------------------------------------

/// Per-frame tick source.
#[async_trait]
pub trait FrameClock: Send + Sync {
    /// Forget the previous frame so the next delta starts from now.
    async fn restart(&self);

    /// Suspend until the next frame boundary and return the time elapsed
    /// since the previous one.
    async fn next_frame(&self) -> Duration;
}

/// Uniform index source.
pub trait RandomSource: Send + Sync {
    /// A uniformly random index in `0..upper`. `upper` must be non-zero.
    fn pick(&self, upper: usize) -> usize;
}

// ---------------------------------------------------------------------------
// Per-variant input devices
// ---------------------------------------------------------------------------

/// Raw input from a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// Pointer held down at a position.
    Drag(Point),
    /// Pointer released, ending the stroke.
    Release,
}

/// Stroke input and display for the drawing game.
pub trait DrawingSurface: Send + Sync {
    /// Enable or disable stroke capture on the device side.
    fn set_enabled(&self, enabled: bool);

    /// Take all input received since the previous call.
    fn drain_input(&self) -> Vec<SurfaceEvent>;

    /// Redraw the accepted stroke.
    fn render_stroke(&self, points: &[Point]);
}

/// Display state of one button slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLight {
    Off,
    Lit,
    Accepted,
    Missed,
}

/// Button pad for the reaction game.
#[async_trait]
pub trait MashPad: Send + Sync {
    /// Number of slots on the pad.
    fn slot_count(&self) -> usize;

    /// Show or hide the pad.
    fn set_active(&self, active: bool);

    /// Change one slot's light.
    fn set_slot(&self, slot: usize, light: SlotLight);

    /// Next pressed slot. `None` once the device has no more input.
    /// Must be cancel-safe: the future is dropped when a window closes.
    async fn next_press(&self) -> Option<usize>;
}

/// Rotating cube and color buttons for the recall game.
#[async_trait]
pub trait RecallDevice: Send + Sync {
    /// Show or hide the cube.
    fn set_visible(&self, visible: bool);

    /// Repaint every face with its own color.
    fn restore_faces(&self);

    /// Animate a quarter turn. `progress` runs from 0 to 1 and the last call
    /// of each turn always carries exactly 1.0.
    fn rotate(&self, axis: RotationAxis, progress: f64);

    /// Read the color currently showing at a face position.
    fn sample_face_color(&self, face: Face) -> Option<ColorId>;

    /// Blank the faces and show the color buttons for a query on `face`.
    fn open_answer(&self, face: Face);

    /// Hide the color buttons and repaint the faces.
    fn close_answer(&self);

    /// Next chosen color-button index. `None` once the device has no more
    /// input. Must be cancel-safe.
    async fn next_choice(&self) -> Option<usize>;
}

// ---------------------------------------------------------------------------
// Storage and leaderboard
// ---------------------------------------------------------------------------

/// Opaque key/value store for per-game scores.
pub trait ScoreStore: Send + Sync {
    fn save(&self, key: &str, value: i32) -> Result<()>;

    /// Stored value, or `default` when the key is absent.
    fn load(&self, key: &str, default: i32) -> i32;
}

/// Leaderboard sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreOrder {
    HighScoreDesc,
}

/// Fire-and-forget score submission.
pub trait Leaderboard: Send + Sync {
    fn submit(&self, board_id: u32, score: f64, order: ScoreOrder);
}

// ---------------------------------------------------------------------------
// Scene host
// ---------------------------------------------------------------------------

/// Collaborators a mini-game may pick from when it is initialized.
#[derive(Clone)]
pub struct Capabilities {
    pub clock: Arc<dyn FrameClock>,
    pub random: Arc<dyn RandomSource>,
    pub surface: Option<Arc<dyn DrawingSurface>>,
    pub pad: Option<Arc<dyn MashPad>>,
    pub cube: Option<Arc<dyn RecallDevice>>,
}

impl Capabilities {
    pub fn new(clock: Arc<dyn FrameClock>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            clock,
            random,
            surface: None,
            pad: None,
            cube: None,
        }
    }

    pub fn with_surface(mut self, surface: Arc<dyn DrawingSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_pad(mut self, pad: Arc<dyn MashPad>) -> Self {
        self.pad = Some(pad);
        self
    }

    pub fn with_cube(mut self, cube: Arc<dyn RecallDevice>) -> Self {
        self.cube = Some(cube);
        self
    }
}

/// The port set valid for the current scene.
#[derive(Clone)]
pub struct Bindings {
    pub ui: Arc<dyn UiPort>,
    pub capabilities: Capabilities,
}

/// Scene switching and the results screen.
#[async_trait]
pub trait SceneHost: Send + Sync {
    /// Ports for the scene that is currently loaded. Re-read after every
    /// scene switch; earlier bindings may be stale.
    fn bindings(&self) -> Bindings;

    /// Switch to the scene for lineup position `index` (0-based). Resolves
    /// once the new scene is ready.
    async fn load_game_scene(&self, index: usize);

    /// Hand the final summary to the results screen.
    fn show_results(&self, summary: &ResultSummary);
}
