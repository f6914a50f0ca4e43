//! Deterministic game-rule module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Synchronous state transitions (no timers, no callbacks)
//! - No rendering or platform dependencies
//!
//! Presentation reads state snapshots and the drained event stream.

pub mod board;
pub mod engine;
pub mod state;

pub use board::{LevelConfig, generate_pool, reshuffle_pool};
pub use engine::{Game, GameEvent, SelectOutcome};
pub use state::{Balloon, BalloonId, GamePhase, GameState, RngState};
