//! Console UI port that narrates a session through `tracing`.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use skillrank_core::signal::SignalLatch;
use skillrank_core::traits::{CountdownStep, UiPort};

#[derive(Debug, Default)]
struct Display {
    title: String,
    whole_seconds: Option<u64>,
    score: i32,
    message: String,
}

/// Logs what a screen would show. The start button is pressed automatically
/// after a delay unless auto-start is off, in which case
/// [`ConsoleUi::press_start`] must be called.
#[derive(Debug)]
pub struct ConsoleUi {
    scene: usize,
    start: SignalLatch,
    auto_start: Option<Duration>,
    display: Mutex<Display>,
}

impl ConsoleUi {
    pub fn new(scene: usize, auto_start: Option<Duration>) -> Self {
        Self {
            scene,
            start: SignalLatch::new(),
            auto_start,
            display: Mutex::new(Display::default()),
        }
    }

    pub fn press_start(&self) -> bool {
        self.start.resolve()
    }

    /// The last score shown.
    pub fn score(&self) -> i32 {
        self.display().score
    }

    pub fn title(&self) -> String {
        self.display().title.clone()
    }

    pub fn message(&self) -> String {
        self.display().message.clone()
    }

    fn display(&self) -> std::sync::MutexGuard<'_, Display> {
        self.display.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UiPort for ConsoleUi {
    fn show_title(&self, title: &str, position: usize, total: usize) {
        tracing::info!(scene = self.scene, "game {position}/{total}: {title}");
        self.display().title = title.to_string();
    }

    fn update_timer(&self, seconds_remaining: f64) {
        let whole = seconds_remaining.max(0.0).ceil() as u64;
        let mut display = self.display();
        if display.whole_seconds != Some(whole) {
            display.whole_seconds = Some(whole);
            tracing::debug!(scene = self.scene, remaining = whole, "timer");
        }
    }

    fn update_score(&self, value: i32) {
        let mut display = self.display();
        if display.score != value {
            display.score = value;
            tracing::debug!(scene = self.scene, score = value, "score");
        }
    }

    fn set_message(&self, text: &str) {
        if !text.is_empty() {
            tracing::info!(scene = self.scene, "{text}");
        }
        self.display().message = text.to_string();
    }

    fn show_countdown_step(&self, step: CountdownStep) {
        match step {
            CountdownStep::Count(n) => tracing::info!(scene = self.scene, "{n}..."),
            CountdownStep::Start => tracing::info!(scene = self.scene, "START"),
            CountdownStep::Hidden => {}
        }
    }

    async fn await_start_signal(&self) {
        let wait = self.start.arm();
        match self.auto_start {
            Some(delay) => {
                let press = async {
                    tokio::time::sleep(delay).await;
                    self.start.resolve();
                    std::future::pending::<()>().await
                };
                tokio::select! {
                    _ = wait.wait() => {}
                    _ = press => {}
                }
            }
            None => {
                wait.wait().await;
            }
        }
        tracing::debug!(scene = self.scene, "start pressed");
    }
}
