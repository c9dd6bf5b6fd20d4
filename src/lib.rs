//! # card-match
//!
//! Game-state engine for a memory-matching ("Concentration") card game.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Agnostic**: No rendering, tweening or audio playback.
//!    The engine reports what happened through events and collaborator
//!    traits; the host draws and plays it.
//!
//! 2. **Virtual Time**: Every delay (deal preview, flip animation, judgment
//!    delay, auto-save) runs on a timer queue the host advances from its
//!    frame loop. Nothing spawns threads.
//!
//! 3. **Explicit Ownership**: A `Session` owns its engine and its save
//!    manager. There are no process-wide singletons or statics.
//!
//! ## Modules
//!
//! - `core`: Card and symbol ids, RNG, configuration
//! - `cards`: Card entity, grid and grid allocator, slot layout
//! - `rules`: Turn state and the match engine state machine
//! - `schedule`: Deferred-callback timer queue
//! - `persist`: Save record, key-value stores, save manager
//! - `session`: Command surface, auto-save, collaborator traits
//! - `error`: Error types

pub mod core;
pub mod cards;
pub mod rules;
pub mod schedule;
pub mod persist;
pub mod session;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    CardId, SymbolId,
    GameRng,
    GameConfig, SessionConfig, Timings, PairPlacement,
    clamp_dimension,
};

pub use crate::cards::{Card, Grid, Slot};

pub use crate::rules::{MatchEngine, Phase, TurnState, FirstSelection, AudioCue, EngineEvent};

pub use crate::schedule::TimerQueue;

pub use crate::persist::{
    SaveManager, SaveSnapshot, CardRecord,
    KeyValueStore, MemoryStore, FileStore,
};

pub use crate::session::{Session, SymbolAtlas, AudioSink, EmojiAtlas, NullAudio};

pub use crate::error::{StartError, StoreError, SaveError, LoadError};
