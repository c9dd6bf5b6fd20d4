//! Timer scheduling.
//!
//! All delays in the game (deal preview, flip animations, judgment delay,
//! auto-save) run on one virtual clock driven by the host's frame loop.
//! Everything happens on the caller's thread; there is no background task.

pub mod queue;

pub use queue::TimerQueue;
