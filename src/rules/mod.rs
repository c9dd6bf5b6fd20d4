//! Match rules.
//!
//! [`MatchEngine`] owns the grid and the turn counters and decides what a
//! click does. It never touches audio, rendering or storage itself; it
//! reports [`EngineEvent`]s and leaves the rest to the session.

pub mod engine;
pub mod events;
pub mod state;

pub use engine::MatchEngine;
pub use events::{AudioCue, EngineEvent};
pub use state::{FirstSelection, Phase, TurnState};
