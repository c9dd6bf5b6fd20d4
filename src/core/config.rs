//! Game and session configuration.
//!
//! Everything here is instance-scoped: a session is created with a
//! `SessionConfig`, and every `start_game` call carries its own `GameConfig`.
//!
//! - `GameConfig`: grid dimensions, with the derived cell and pair counts
//! - `Timings`: preview, flip and judgment delays
//! - `PairPlacement`: how symbol pairs are spread over the grid
//! - `SessionConfig`: combines the above with auto-save and seeding
//!
//! `Timings` and `SessionConfig` deserialize from JSON with every field
//! optional, so a host can ship a partial config file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StartError;

/// Smallest allowed row or column count.
pub const MIN_DIMENSION: u8 = 2;

/// Largest allowed row or column count.
pub const MAX_DIMENSION: u8 = 6;

/// Parse a row/column entry typed by the player.
///
/// Numbers are clamped into `[MIN_DIMENSION, MAX_DIMENSION]`; anything that
/// does not parse keeps `current`.
///
/// ```
/// use card_match::core::clamp_dimension;
///
/// assert_eq!(clamp_dimension("4", 2), 4);
/// assert_eq!(clamp_dimension("12", 2), 6);
/// assert_eq!(clamp_dimension("abc", 3), 3);
/// ```
#[must_use]
pub fn clamp_dimension(input: &str, current: u8) -> u8 {
    match input.trim().parse::<i64>() {
        Ok(value) => value.clamp(i64::from(MIN_DIMENSION), i64::from(MAX_DIMENSION)) as u8,
        Err(_) => current,
    }
}

/// Grid dimensions for one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    rows: u8,
    cols: u8,
}

impl GameConfig {
    /// Create a configuration, rejecting dimensions outside `[2, 6]`.
    pub fn new(rows: u8, cols: u8) -> Result<Self, StartError> {
        let valid = MIN_DIMENSION..=MAX_DIMENSION;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(StartError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// `rows * cols`.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }

    /// Cells that receive a card: one is dropped when the total is odd.
    #[must_use]
    pub fn usable_cells(&self) -> usize {
        let total = self.total_cells();
        total - total % 2
    }

    /// Number of symbol pairs a deal needs.
    #[must_use]
    pub fn pairs_needed(&self) -> usize {
        self.usable_cells() / 2
    }

    /// Check the deal precondition against the symbols on offer.
    pub fn check_symbols(&self, available: usize) -> Result<(), StartError> {
        let needed = self.pairs_needed();
        if needed > available {
            return Err(StartError::NotEnoughSymbols { needed, available });
        }
        Ok(())
    }
}

/// How the allocator spreads symbol pairs over the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPlacement {
    /// Random start cell, probing forward (wrapping) past taken cells.
    ///
    /// Not a uniform permutation: cells right after an occupied run are
    /// favoured. Kept as the default to reproduce the classic deal.
    #[default]
    LinearProbe,
    /// Lay the pairs out in order, then Fisher–Yates shuffle them.
    Shuffled,
}

/// Delays of the reveal/flip/judge cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Face-up preview after a deal, before every card flips face-down.
    pub reveal_delay_ms: u64,
    /// One full card flip (two half turns).
    pub flip_duration_ms: u64,
    /// Pause between a flip settling and the click being judged.
    pub selection_delay_ms: u64,
    /// Volume of the mismatch cue.
    pub mismatch_volume: f32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 300,
            flip_duration_ms: 500,
            selection_delay_ms: 500,
            mismatch_volume: 0.8,
        }
    }
}

impl Timings {
    /// Timings with every delay set to zero: judgments happen on the next
    /// `advance` call. Handy for tests and headless play.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            reveal_delay_ms: 0,
            flip_duration_ms: 0,
            selection_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Preview delay as a `Duration`.
    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Flip duration as a `Duration`.
    #[must_use]
    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }

    /// Judgment delay as a `Duration`.
    #[must_use]
    pub fn selection_delay(&self) -> Duration {
        Duration::from_millis(self.selection_delay_ms)
    }
}

/// Configuration of a whole session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Animation and judgment delays.
    pub timings: Timings,
    /// Auto-save period; `None` leaves auto-save off until enabled by hand.
    pub auto_save_interval_ms: Option<u64>,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Pair placement strategy.
    pub placement: PairPlacement,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            auto_save_interval_ms: Some(30_000),
            seed: None,
            placement: PairPlacement::default(),
        }
    }
}

impl SessionConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the timings.
    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Set the pair placement strategy.
    #[must_use]
    pub fn with_placement(mut self, placement: PairPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Set (or clear) the auto-save period.
    #[must_use]
    pub fn with_auto_save(mut self, interval: Option<Duration>) -> Self {
        self.auto_save_interval_ms = interval.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Auto-save period as a `Duration`.
    #[must_use]
    pub fn auto_save_interval(&self) -> Option<Duration> {
        self.auto_save_interval_ms.map(Duration::from_millis)
    }
}
