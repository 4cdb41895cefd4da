//! skillrank-core — Mini-game orchestration engine, scoring, and ranking.
//!
//! This crate defines the data model, the collaborator ports, the three
//! mini-game variants, the session state machine, and the result aggregation
//! that the rest of skillrank builds on.

pub mod clock;
pub mod error;
pub mod games;
pub mod mock;
pub mod model;
pub mod random;
pub mod report;
pub mod results;
pub mod scoring;
pub mod session;
pub mod signal;
pub mod storage;
pub mod traits;
