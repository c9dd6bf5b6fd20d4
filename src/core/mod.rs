//! Core types: identifiers, RNG, configuration.
//!
//! These are the building blocks every other module shares. Nothing here
//! knows about turns, timers or storage.

pub mod entity;
pub mod rng;
pub mod config;

pub use entity::{CardId, SymbolId};
pub use rng::GameRng;
pub use config::{
    clamp_dimension, GameConfig, PairPlacement, SessionConfig, Timings, MAX_DIMENSION,
    MIN_DIMENSION,
};
