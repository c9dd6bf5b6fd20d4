//! Card-to-cell mapping.
//!
//! Cards fill the grid row-major. When `rows * cols` is odd the centre cell
//! (index `rows * cols / 2`) stays empty, so the gap sits in the middle of
//! the board instead of at its last corner.
//!
//! Pixel positions are the presentation layer's business; this only says
//! which row and column each card occupies.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, GameConfig};

/// Grid cell occupied by a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub card: CardId,
    pub row: u8,
    pub col: u8,
}

/// `(row, col)` of every card, in card id order.
#[must_use]
pub fn slot_positions(config: GameConfig) -> Vec<(u8, u8)> {
    let total = config.total_cells();
    let skipped = (total % 2 == 1).then_some(total / 2);
    let cols = usize::from(config.cols());

    (0..total)
        .filter(|&cell| Some(cell) != skipped)
        .map(|cell| ((cell / cols) as u8, (cell % cols) as u8))
        .collect()
}

/// The cell left empty on odd grids.
#[must_use]
pub fn empty_cell(config: GameConfig) -> Option<(u8, u8)> {
    let total = config.total_cells();
    if total % 2 == 0 {
        return None;
    }
    let middle = total / 2;
    let cols = usize::from(config.cols());
    Some(((middle / cols) as u8, (middle % cols) as u8))
}
