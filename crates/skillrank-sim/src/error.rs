//! Simulation error types.

use thiserror::Error;

/// Errors raised while assembling a simulated session.
#[derive(Debug, Error)]
pub enum SimError {
    /// No profile with this name is configured or built in.
    #[error("unknown player '{name}' (available: {available})")]
    UnknownPlayer { name: String, available: String },

    /// The `SKILLRANK_SEED` override is not a number.
    #[error("invalid SKILLRANK_SEED value '{0}'")]
    InvalidSeed(String),
}
