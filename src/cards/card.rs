//! Card entity - state of one grid cell.
//!
//! A `Card` is plain data: identity, face symbol, and two flags.
//!
//! - `active`: still in play. Cleared once the card is matched.
//! - `flipped`: face-up. Set while revealed, during the deal preview, and
//!   for every matched card.
//!
//! ## Symbol assignment
//!
//! There are two ways to give a card its face:
//!
//! - [`Card::deal_symbol`] is used when dealing a fresh grid and always turns
//!   the card face-up so the player gets to see the preview.
//! - [`Card::set_symbol`] only records the symbol. Restoring a saved game
//!   uses it because the flip state comes from the save, not from the deal.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, SymbolId};

/// One card in the grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    symbol: SymbolId,
    active: bool,
    flipped: bool,
}

impl Card {
    /// Create an active, face-down card without a symbol.
    #[must_use]
    pub fn new(id: CardId) -> Self {
        Self {
            id,
            symbol: SymbolId::UNASSIGNED,
            active: true,
            flipped: false,
        }
    }

    /// Card identity.
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Face symbol, `SymbolId::UNASSIGNED` before dealing.
    #[must_use]
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    /// Still in play (not matched yet)?
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Face-up?
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Record a symbol without touching the flip state.
    pub fn set_symbol(&mut self, symbol: SymbolId) {
        self.symbol = symbol;
    }

    /// Assign a symbol during a deal: the card turns face-up.
    pub fn deal_symbol(&mut self, symbol: SymbolId) {
        self.symbol = symbol;
        self.flipped = true;
    }

    /// Mark the card in play or matched.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Turn the card face-up or face-down.
    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    /// Back to the default face-down orientation.
    pub fn reset_orientation(&mut self) {
        self.flipped = false;
    }

    /// Can this card be picked by the player?
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.active && !self.flipped
    }
}
