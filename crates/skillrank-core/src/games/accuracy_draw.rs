//! Draw-a-circle game.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GameError;
use crate::games::MiniGame;
use crate::model::{MiniGameDescriptor, Point};
use crate::scoring::{evaluate_circle_accuracy, final_drawing_score, is_shape_too_small};
use crate::traits::{Capabilities, DrawingSurface, FrameClock, SurfaceEvent, UiPort};

/// Drag points closer than this to the previous one are dropped.
pub const MIN_POINT_SPACING: f64 = 0.01;

/// A released stroke with fewer points than this is abandoned.
pub const MIN_STROKE_POINTS: usize = 100;

/// How long the abandon message stays up.
const ABANDON_MESSAGE_TIME: Duration = Duration::from_secs(1);

const ABANDON_MESSAGE: &str = "Too small! Draw a bigger circle";

/// Result of feeding one surface event to a [`StrokeRecorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// A point was appended.
    Extended,
    /// The point was too close to the previous one.
    Ignored,
    /// The stroke was released and is scoreable.
    Completed,
    /// The stroke was released too short or too small and has been cleared.
    Abandoned,
}

/// Accumulates one stroke and decides on release whether it counts.
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    points: Vec<Point>,
    min_spacing: f64,
    min_points: usize,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new(MIN_POINT_SPACING, MIN_STROKE_POINTS)
    }
}

impl StrokeRecorder {
    pub fn new(min_spacing: f64, min_points: usize) -> Self {
        Self {
            points: Vec::new(),
            min_spacing,
            min_points,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn apply(&mut self, event: SurfaceEvent) -> StrokeOutcome {
        match event {
            SurfaceEvent::Drag(point) => {
                let far_enough = self
                    .points
                    .last()
                    .map_or(true, |last| last.distance(&point) > self.min_spacing);
                if far_enough {
                    self.points.push(point);
                    StrokeOutcome::Extended
                } else {
                    StrokeOutcome::Ignored
                }
            }
            SurfaceEvent::Release => {
                if self.points.len() < self.min_points || is_shape_too_small(&self.points) {
                    self.points.clear();
                    StrokeOutcome::Abandoned
                } else {
                    StrokeOutcome::Completed
                }
            }
        }
    }
}

/// Draw one closed stroke as close to a circle as possible before time runs
/// out. Unused time earns a small bonus.
pub struct AccuracyDraw {
    descriptor: MiniGameDescriptor,
    clock: Option<Arc<dyn FrameClock>>,
    surface: Option<Arc<dyn DrawingSurface>>,
    initialized: bool,
    recorder: StrokeRecorder,
    time_remaining: f64,
    has_drawn: bool,
}

impl AccuracyDraw {
    pub fn new(descriptor: MiniGameDescriptor) -> Self {
        let time_remaining = descriptor.duration().as_secs_f64();
        Self {
            descriptor,
            clock: None,
            surface: None,
            initialized: false,
            recorder: StrokeRecorder::default(),
            time_remaining,
            has_drawn: false,
        }
    }

    /// Points of the last stroke, completed or in progress.
    pub fn samples(&self) -> &[Point] {
        self.recorder.points()
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    pub fn has_drawn(&self) -> bool {
        self.has_drawn
    }

    fn require(&self) -> Result<(Arc<dyn FrameClock>, Arc<dyn DrawingSurface>), GameError> {
        if !self.initialized {
            return Err(GameError::NotInitialized {
                game: self.descriptor.title.clone(),
            });
        }
        let clock = self.clock.clone().ok_or_else(|| GameError::MissingCollaborator {
            game: self.descriptor.title.clone(),
            collaborator: "frame clock",
        })?;
        let surface = self
            .surface
            .clone()
            .ok_or_else(|| GameError::MissingCollaborator {
                game: self.descriptor.title.clone(),
                collaborator: "drawing surface",
            })?;
        Ok((clock, surface))
    }
}

#[async_trait]
impl MiniGame for AccuracyDraw {
    fn descriptor(&self) -> &MiniGameDescriptor {
        &self.descriptor
    }

    fn initialize(&mut self, capabilities: &Capabilities) {
        self.clock = Some(capabilities.clock.clone());
        self.surface = capabilities.surface.clone();
        self.initialized = true;
    }

    async fn play(&mut self, ui: &dyn UiPort) -> Result<i32, GameError> {
        let (clock, surface) = self.require()?;

        self.recorder.clear();
        self.has_drawn = false;
        self.time_remaining = self.descriptor.duration().as_secs_f64();
        surface.set_enabled(true);
        clock.restart().await;

        while self.time_remaining > 0.0 && !self.has_drawn {
            let dt = clock.next_frame().await;
            self.time_remaining -= dt.as_secs_f64();
            ui.update_timer(self.time_remaining.max(0.0));

            let mut abandoned = false;
            for event in surface.drain_input() {
                match self.recorder.apply(event) {
                    StrokeOutcome::Completed => {
                        self.has_drawn = true;
                        break;
                    }
                    StrokeOutcome::Abandoned => abandoned = true,
                    StrokeOutcome::Extended | StrokeOutcome::Ignored => {}
                }
            }
            surface.render_stroke(self.recorder.points());
            ui.update_score(evaluate_circle_accuracy(self.recorder.points()));

            if abandoned && !self.has_drawn {
                tracing::debug!(game = %self.descriptor.title, "stroke abandoned");
                ui.set_message(ABANDON_MESSAGE);
                tokio::time::sleep(ABANDON_MESSAGE_TIME).await;
                ui.set_message("");
            }
        }

        surface.set_enabled(false);
        let remaining = self.time_remaining.max(0.0);
        let score = final_drawing_score(self.recorder.points(), remaining);
        tracing::info!(
            game = %self.descriptor.title,
            points = self.recorder.points().len(),
            remaining_secs = remaining,
            score,
            "drawing finished"
        );
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::IntervalClock;
    use crate::mock::{RecordingUi, ScriptedRandom, ScriptedSurface};
    use crate::model::GameVariant;

    fn circle(n: usize, radius: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / n as f64;
                Point::new(radius * a.cos(), radius * a.sin())
            })
            .collect()
    }

    fn game_with(surface: Arc<ScriptedSurface>) -> AccuracyDraw {
        let caps = Capabilities::new(
            Arc::new(IntervalClock::default()),
            Arc::new(ScriptedRandom::default()),
        )
        .with_surface(surface);
        let mut game = AccuracyDraw::new(MiniGameDescriptor::standard(GameVariant::AccuracyDraw));
        game.initialize(&caps);
        game
    }

    #[test]
    fn recorder_drops_close_points() {
        let mut rec = StrokeRecorder::default();
        assert_eq!(rec.apply(SurfaceEvent::Drag(Point::new(0.0, 0.0))), StrokeOutcome::Extended);
        assert_eq!(rec.apply(SurfaceEvent::Drag(Point::new(0.005, 0.0))), StrokeOutcome::Ignored);
        assert_eq!(rec.apply(SurfaceEvent::Drag(Point::new(0.02, 0.0))), StrokeOutcome::Extended);
        assert_eq!(rec.points().len(), 2);
    }

    #[test]
    fn recorder_abandons_short_strokes() {
        let mut rec = StrokeRecorder::default();
        for p in circle(99, 3.0) {
            rec.apply(SurfaceEvent::Drag(p));
        }
        assert_eq!(rec.apply(SurfaceEvent::Release), StrokeOutcome::Abandoned);
        assert!(rec.points().is_empty());
    }

    #[test]
    fn recorder_abandons_tiny_shapes() {
        let mut rec = StrokeRecorder::default();
        // 120 points on a radius-0.3 circle are spaced ~0.016 apart.
        for p in circle(120, 0.3) {
            rec.apply(SurfaceEvent::Drag(p));
        }
        assert_eq!(rec.points().len(), 120);
        assert_eq!(rec.apply(SurfaceEvent::Release), StrokeOutcome::Abandoned);
    }

    #[test]
    fn recorder_abandons_empty_release() {
        let mut rec = StrokeRecorder::default();
        assert_eq!(rec.apply(SurfaceEvent::Release), StrokeOutcome::Abandoned);
    }

    #[test]
    fn recorder_completes_real_circle() {
        let mut rec = StrokeRecorder::default();
        for p in circle(150, 3.0) {
            rec.apply(SurfaceEvent::Drag(p));
        }
        assert_eq!(rec.apply(SurfaceEvent::Release), StrokeOutcome::Completed);
        assert_eq!(rec.points().len(), 150);
    }

    #[tokio::test(start_paused = true)]
    async fn uninitialized_play_fails() {
        let mut game = AccuracyDraw::new(MiniGameDescriptor::standard(GameVariant::AccuracyDraw));
        let err = game.play(&RecordingUi::auto_start()).await.unwrap_err();
        assert!(matches!(err, GameError::NotInitialized { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_surface_is_reported() {
        let caps = Capabilities::new(
            Arc::new(IntervalClock::default()),
            Arc::new(ScriptedRandom::default()),
        );
        let mut game = AccuracyDraw::new(MiniGameDescriptor::standard(GameVariant::AccuracyDraw));
        game.initialize(&caps);
        let err = game.play(&RecordingUi::auto_start()).await.unwrap_err();
        assert!(matches!(
            err,
            GameError::MissingCollaborator { collaborator: "drawing surface", .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn quick_circle_scores_accuracy_plus_bonus() {
        let surface = Arc::new(ScriptedSurface::new());
        let stroke = circle(150, 3.0);
        surface.push_stroke(&stroke);
        let mut game = game_with(surface.clone());
        let ui = RecordingUi::auto_start();

        let score = game.play(&ui).await.unwrap();

        assert!(game.has_drawn());
        // One frame elapsed: ~29.98s left, bonus round(2.998) = 3.
        let expected = (evaluate_circle_accuracy(&stroke) + 3).min(100);
        assert_eq!(score, expected);
        assert_eq!(score, 100);
        assert_eq!(surface.enabled_history(), vec![true, false]);
        assert_eq!(surface.rendered_len(), 150);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_without_stroke_scores_zero() {
        let surface = Arc::new(ScriptedSurface::new());
        let mut game = game_with(surface);
        let ui = RecordingUi::auto_start();

        let score = game.play(&ui).await.unwrap();

        assert_eq!(score, 0);
        assert!(!game.has_drawn());
        assert_eq!(game.time_remaining().max(0.0), 0.0);
        assert_eq!(ui.timers().last().copied(), Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_stroke_shows_message_then_retries() {
        let surface = Arc::new(ScriptedSurface::new());
        surface.push_stroke(&circle(50, 3.0));
        surface.push_stroke(&circle(150, 3.0));
        let mut game = game_with(surface);
        let ui = RecordingUi::auto_start();

        let start = tokio::time::Instant::now();
        let score = game.play(&ui).await.unwrap();

        assert!(start.elapsed() >= ABANDON_MESSAGE_TIME);
        assert_eq!(ui.messages(), vec![ABANDON_MESSAGE.to_string(), String::new()]);
        assert!(game.has_drawn());
        // ~1s of message time spent: ~28.97s left, bonus 3.
        assert_eq!(score, 100);
        assert!(game.time_remaining() < 29.0);
    }
}
