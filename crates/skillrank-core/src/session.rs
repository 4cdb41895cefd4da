//! Session orchestrator.
//!
//! Walks a lineup of mini-games through
//! `AwaitStart → Countdown → Playing → Advancing → {AwaitStart | Finished}`,
//! persisting each score and handing the aggregate to the results screen at
//! the end. Exactly one game plays at a time and a playing game is never
//! preempted.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::GameError;
use crate::games::{build_lineup, MiniGame};
use crate::model::{GameKey, MiniGameDescriptor};
use crate::results::{ResultSummary, RANK_BOARD_ID};
use crate::traits::{Leaderboard, SceneHost, ScoreStore, UiPort};

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Numbered countdown steps before START.
    pub countdown_from: u32,
    /// Length of each countdown step, START included.
    pub countdown_step: Duration,
    /// Pause between a game ending and the next scene loading.
    pub settle_delay: Duration,
    /// Leaderboard the rank score goes to.
    pub board_id: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_from: 3,
            countdown_step: Duration::from_secs(1),
            settle_delay: Duration::from_millis(500),
            board_id: RANK_BOARD_ID,
        }
    }
}

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitStart,
    Countdown,
    Playing,
    Advancing,
    Finished,
}

/// Lineup and cursor.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub games: Vec<MiniGameDescriptor>,
    /// Index of the current game, 0-based.
    pub index: usize,
    pub phase: Phase,
}

/// Progress reporting trait.
pub trait SessionObserver: Send + Sync {
    fn on_game_start(&self, position: usize, total: usize, title: &str);
    fn on_game_complete(&self, key: GameKey, title: &str, score: i32, elapsed: Duration);
    fn on_game_error(&self, title: &str, error: &GameError);
    fn on_session_complete(&self, summary: &ResultSummary);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_game_start(&self, _: usize, _: usize, _: &str) {}
    fn on_game_complete(&self, _: GameKey, _: &str, _: i32, _: Duration) {}
    fn on_game_error(&self, _: &str, _: &GameError) {}
    fn on_session_complete(&self, _: &ResultSummary) {}
}

/// The session orchestrator.
pub struct Session {
    games: Vec<Box<dyn MiniGame>>,
    state: SessionState,
    host: Arc<dyn SceneHost>,
    store: Arc<dyn ScoreStore>,
    leaderboard: Arc<dyn Leaderboard>,
    observer: Arc<dyn SessionObserver>,
    config: SessionConfig,
    ui: Option<Arc<dyn UiPort>>,
    play_count: u32,
    summary: Option<ResultSummary>,
}

impl Session {
    pub fn new(
        lineup: &[MiniGameDescriptor],
        host: Arc<dyn SceneHost>,
        store: Arc<dyn ScoreStore>,
        leaderboard: Arc<dyn Leaderboard>,
    ) -> Self {
        Self {
            games: build_lineup(lineup),
            state: SessionState {
                games: lineup.to_vec(),
                index: 0,
                phase: Phase::AwaitStart,
            },
            host,
            store,
            leaderboard,
            observer: Arc::new(NoopObserver),
            config: SessionConfig::default(),
            ui: None,
            play_count: 0,
            summary: None,
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_index(&self) -> usize {
        self.state.index
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Total `play` invocations since the session was built.
    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    /// The summary handed to the results screen, once finished.
    pub fn summary(&self) -> Option<&ResultSummary> {
        self.summary.as_ref()
    }

    pub fn games(&self) -> &[Box<dyn MiniGame>] {
        &self.games
    }

    /// Run to `Finished` and return the summary. A finished session returns
    /// its summary without playing anything again.
    pub async fn run(&mut self) -> ResultSummary {
        while self.state.phase != Phase::Finished {
            self.step().await;
        }
        match &self.summary {
            Some(summary) => summary.clone(),
            None => ResultSummary::from_store(self.store.as_ref()),
        }
    }

    /// Perform one phase and return the phase that follows.
    pub async fn step(&mut self) -> Phase {
        let total = self.games.len();
        let index = self.state.index;

        match self.state.phase {
            Phase::AwaitStart => {
                if index >= total {
                    self.finish();
                    return self.state.phase;
                }
                // The previous scene's ports may be gone; always rebind.
                let bindings = self.host.bindings();
                let game = &mut self.games[index];
                game.initialize(&bindings.capabilities);
                bindings.ui.show_title(game.title(), index + 1, total);
                self.observer.on_game_start(index + 1, total, game.title());
                tracing::info!(position = index + 1, total, game = %game.title(), "awaiting start");
                self.ui = Some(bindings.ui.clone());

                bindings.ui.await_start_signal().await;
                self.state.phase = Phase::Countdown;
            }
            Phase::Countdown => {
                let ui = self.current_ui();
                ui.show_countdown(self.config.countdown_from, self.config.countdown_step)
                    .await;
                self.state.phase = Phase::Playing;
            }
            Phase::Playing => {
                let ui = self.current_ui();
                let game = &mut self.games[index];
                let title = game.title().to_string();
                let key = game.key();

                let started = Instant::now();
                self.play_count += 1;
                let score = match game.play(ui.as_ref()).await {
                    Ok(score) => score,
                    Err(e) => {
                        tracing::error!(game = %title, error = %e, "game could not be played; scoring 0");
                        self.observer.on_game_error(&title, &e);
                        0
                    }
                };
                let elapsed = started.elapsed();

                if let Err(e) = self.store.save(key.storage_key(), score) {
                    tracing::error!(key = key.storage_key(), error = %e, "failed to persist score");
                }
                tracing::info!(game = %title, key = %key, score, elapsed_ms = elapsed.as_millis() as u64, "game finished");
                self.observer.on_game_complete(key, &title, score, elapsed);
                self.state.phase = Phase::Advancing;
            }
            Phase::Advancing => {
                self.state.index += 1;
                if self.state.index >= total {
                    self.finish();
                } else {
                    tokio::time::sleep(self.config.settle_delay).await;
                    self.ui = None;
                    self.host.load_game_scene(self.state.index).await;
                    self.state.phase = Phase::AwaitStart;
                }
            }
            Phase::Finished => {}
        }
        self.state.phase
    }

    /// Return to the first game. Only meaningful once finished, but allowed
    /// from any phase between steps.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        self.state.index = 0;
        self.state.phase = Phase::AwaitStart;
        self.ui = None;
        self.summary = None;
    }

    /// Reset and load the first game's scene.
    pub async fn retry(&mut self) {
        self.reset();
        self.host.load_game_scene(0).await;
    }

    fn current_ui(&mut self) -> Arc<dyn UiPort> {
        match &self.ui {
            Some(ui) => ui.clone(),
            None => {
                let ui = self.host.bindings().ui;
                self.ui = Some(ui.clone());
                ui
            }
        }
    }

    fn finish(&mut self) {
        self.state.phase = Phase::Finished;
        let summary = ResultSummary::from_store(self.store.as_ref());
        tracing::info!(
            total = summary.total,
            rank_score = summary.rank_score,
            rank = %summary.rank,
            "session finished"
        );
        summary.submit_to(self.leaderboard.as_ref(), self.config.board_id);
        self.host.show_results(&summary);
        self.observer.on_session_complete(&summary);
        self.summary = Some(summary);
    }
}
