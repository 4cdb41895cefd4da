//! Mini-game trait and the three variants.
//!
//! A variant is chosen by the descriptor's tag in [`build_game`]. Each one
//! picks the collaborators it needs out of [`Capabilities`] in `initialize`,
//! which the session calls again after every scene switch.

pub mod accuracy_draw;
pub mod cube;
pub mod reaction_mash;
pub mod sequence_recall;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::GameError;
use crate::model::{GameKey, GameVariant, MiniGameDescriptor};
use crate::traits::{Capabilities, UiPort};

pub use accuracy_draw::AccuracyDraw;
pub use reaction_mash::ReactionMash;
pub use sequence_recall::SequenceRecall;

/// One self-contained skill challenge.
#[async_trait]
pub trait MiniGame: Send + Sync {
    fn descriptor(&self) -> &MiniGameDescriptor;

    /// Display name.
    fn title(&self) -> &str {
        &self.descriptor().title
    }

    /// Nominal time budget.
    fn duration(&self) -> Duration {
        self.descriptor().duration()
    }

    /// Storage slot for this game's score.
    fn key(&self) -> GameKey {
        self.descriptor().key()
    }

    /// Bind collaborators from the current scene, replacing earlier ones.
    fn initialize(&mut self, capabilities: &Capabilities);

    /// Arm the game, run it to completion, and return the final score.
    ///
    /// Game-over conditions are not errors. Only a missing collaborator is.
    async fn play(&mut self, ui: &dyn UiPort) -> Result<i32, GameError>;
}

/// Construct the implementation a descriptor selects.
pub fn build_game(descriptor: MiniGameDescriptor) -> Box<dyn MiniGame> {
    match descriptor.variant {
        GameVariant::AccuracyDraw => Box::new(AccuracyDraw::new(descriptor)),
        GameVariant::ReactionMash => Box::new(ReactionMash::new(descriptor)),
        GameVariant::SequenceRecall => Box::new(SequenceRecall::new(descriptor)),
    }
}

/// Build a whole lineup in order.
pub fn build_lineup(descriptors: &[MiniGameDescriptor]) -> Vec<Box<dyn MiniGame>> {
    descriptors.iter().cloned().map(build_game).collect()
}
