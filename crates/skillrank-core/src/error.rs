//! Mini-game error types.
//!
//! Only unrecoverable preconditions are errors. Degenerate input (too few
//! samples, out-of-range choices) is absorbed locally by the scoring code and
//! never surfaces here.

use thiserror::Error;

/// Errors a mini-game can report from `play`.
#[derive(Debug, Error)]
pub enum GameError {
    /// A collaborator the variant needs was never bound.
    #[error("{game}: required collaborator '{collaborator}' is not bound")]
    MissingCollaborator {
        game: String,
        collaborator: &'static str,
    },

    /// `play` was called before `initialize`.
    #[error("{game}: played before initialization")]
    NotInitialized { game: String },
}

impl GameError {
    /// Name of the game that raised the error.
    pub fn game(&self) -> &str {
        match self {
            GameError::MissingCollaborator { game, .. } | GameError::NotInitialized { game } => {
                game
            }
        }
    }
}
