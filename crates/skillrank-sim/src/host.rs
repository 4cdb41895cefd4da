//! Headless scene host.
//!
//! Every scene load builds a fresh set of ports (UI, clock, random source and
//! the one input device the scene's game needs), so ports from an earlier
//! scene are never reused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use skillrank_core::clock::IntervalClock;
use skillrank_core::model::{GameVariant, MiniGameDescriptor};
use skillrank_core::random::SeededRandom;
use skillrank_core::results::ResultSummary;
use skillrank_core::traits::{Bindings, Capabilities, SceneHost};

use crate::config::PlayerProfile;
use crate::console::ConsoleUi;
use crate::players::{CircleBot, RecallBot, ReflexBot};

/// Scene-independent host settings.
#[derive(Debug, Clone)]
pub struct HostSettings {
    pub frame_rate: u32,
    /// `None` leaves the start button to [`SimHost::press_start`].
    pub auto_start: Option<Duration>,
}

/// Devices of the loaded scene, kept for inspection.
#[derive(Clone, Default)]
pub struct SceneDevices {
    pub ui: Option<Arc<ConsoleUi>>,
    pub surface: Option<Arc<CircleBot>>,
    pub pad: Option<Arc<ReflexBot>>,
    pub cube: Option<Arc<RecallBot>>,
}

struct Scene {
    index: usize,
    bindings: Bindings,
    devices: SceneDevices,
}

/// Scene host driven by one simulated player.
pub struct SimHost {
    player: String,
    profile: PlayerProfile,
    lineup: Vec<MiniGameDescriptor>,
    settings: HostSettings,
    seed: u64,
    generation: AtomicU64,
    scene: Mutex<Scene>,
    results: Mutex<Vec<ResultSummary>>,
}

/// Decorrelate per-scene seeds.
fn scene_seed(seed: u64, generation: u64, salt: u64) -> u64 {
    seed ^ generation
        .wrapping_add(1)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .rotate_left(17)
        ^ salt.wrapping_mul(0xBF58_476D_1CE4_E5B9)
}

impl SimHost {
    /// A host with scene 0 already loaded.
    pub fn new(
        player: impl Into<String>,
        profile: PlayerProfile,
        lineup: Vec<MiniGameDescriptor>,
        settings: HostSettings,
        seed: u64,
    ) -> Self {
        let mut host = Self {
            player: player.into(),
            profile,
            lineup,
            settings,
            seed,
            generation: AtomicU64::new(0),
            scene: Mutex::new(Scene {
                index: 0,
                bindings: placeholder_bindings(),
                devices: SceneDevices::default(),
            }),
            results: Mutex::new(Vec::new()),
        };
        let first = host.build_scene(0);
        *host.scene.get_mut().unwrap_or_else(|e| e.into_inner()) = first;
        host
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Index of the loaded scene.
    pub fn scene_index(&self) -> usize {
        self.lock_scene().index
    }

    /// Devices of the loaded scene.
    pub fn devices(&self) -> SceneDevices {
        self.lock_scene().devices.clone()
    }

    /// Press the start button of the loaded scene.
    pub fn press_start(&self) -> bool {
        self.lock_scene()
            .devices
            .ui
            .as_ref()
            .is_some_and(|ui| ui.press_start())
    }

    /// Every summary handed to the results screen.
    pub fn results(&self) -> Vec<ResultSummary> {
        self.results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn lock_scene(&self) -> std::sync::MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn build_scene(&self, index: usize) -> Scene {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let seed_for = |salt| scene_seed(self.seed, generation, salt);

        let ui = Arc::new(ConsoleUi::new(index, self.settings.auto_start));
        let mut capabilities = Capabilities::new(
            Arc::new(IntervalClock::new(self.settings.frame_rate)),
            Arc::new(SeededRandom::from_seed(seed_for(0))),
        );
        let mut devices = SceneDevices {
            ui: Some(ui.clone()),
            ..SceneDevices::default()
        };

        match self.lineup.get(index).map(|g| g.variant) {
            Some(GameVariant::AccuracyDraw) => {
                let bot = Arc::new(CircleBot::new(self.profile.draw.clone(), seed_for(1)));
                capabilities = capabilities.with_surface(bot.clone());
                devices.surface = Some(bot);
            }
            Some(GameVariant::ReactionMash) => {
                let bot = Arc::new(ReflexBot::new(self.profile.mash.clone(), seed_for(2)));
                capabilities = capabilities.with_pad(bot.clone());
                devices.pad = Some(bot);
            }
            Some(GameVariant::SequenceRecall) => {
                let bot = Arc::new(RecallBot::new(self.profile.recall.clone(), seed_for(3)));
                capabilities = capabilities.with_cube(bot.clone());
                devices.cube = Some(bot);
            }
            None => {
                tracing::warn!(index, "scene index beyond the lineup; no input device");
            }
        }

        tracing::debug!(index, generation, player = %self.player, "scene built");
        Scene {
            index,
            bindings: Bindings { ui, capabilities },
            devices,
        }
    }
}

/// Bindings used only while the first scene is being built.
fn placeholder_bindings() -> Bindings {
    Bindings {
        ui: Arc::new(ConsoleUi::new(0, None)),
        capabilities: Capabilities::new(
            Arc::new(IntervalClock::default()),
            Arc::new(SeededRandom::from_seed(0)),
        ),
    }
}

#[async_trait]
impl SceneHost for SimHost {
    fn bindings(&self) -> Bindings {
        self.lock_scene().bindings.clone()
    }

    async fn load_game_scene(&self, index: usize) {
        tracing::info!(index, "loading scene");
        let scene = self.build_scene(index);
        *self.lock_scene() = scene;
        tokio::task::yield_now().await;
    }

    fn show_results(&self, summary: &ResultSummary) {
        tracing::info!(
            player = %self.player,
            scores = ?summary.scores,
            display = ?summary.display,
            rank_score = summary.rank_score,
            total = summary.total,
            rank = %summary.rank,
            "results"
        );
        self.results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(summary.clone());
    }
}
