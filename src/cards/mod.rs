//! Cards and the grid that holds them.
//!
//! ## Key Types
//!
//! - `Card`: one grid cell (identity, symbol, active/flipped flags)
//! - `Grid`: every card of a game, plus the allocator that deals them
//! - `Slot`: which row and column a card sits in

pub mod card;
pub mod grid;
pub mod layout;

pub use card::Card;
pub use grid::{pick_symbols, Grid};
pub use layout::{empty_cell, slot_positions, Slot};
