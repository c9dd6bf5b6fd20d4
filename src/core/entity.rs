//! Card and symbol identifiers.
//!
//! ## CardId
//!
//! Every card in a dealt grid has a `CardId`. Ids are 0-based, dense
//! (`0..card_count`) and stable for the lifetime of the game session, so a
//! card id doubles as the card's index in the grid.
//!
//! ## SymbolId
//!
//! The face a card shows when revealed. Symbol ids index into whatever
//! symbol source the presentation layer provides. `SymbolId::UNASSIGNED`
//! (`-1`) marks a card that has not been given a face yet.
//!
//! ```
//! use card_match::core::{CardId, SymbolId};
//!
//! let card = CardId::new(3);
//! assert_eq!(card.index(), 3);
//!
//! assert!(!SymbolId::UNASSIGNED.is_assigned());
//! assert!(SymbolId::new(0).is_assigned());
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of one card in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position of this card in the grid's card list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Iterate over the ids of a grid holding `count` cards.
    pub fn all(count: usize) -> impl Iterator<Item = CardId> {
        (0..count as u32).map(CardId)
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identifier of a card face.
///
/// Any integer is accepted; keeping ids inside the available symbol range is
/// the allocator's job, not the card's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub i32);

impl SymbolId {
    /// Marker for a card without a face.
    pub const UNASSIGNED: SymbolId = SymbolId(-1);

    /// Create a new symbol ID.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Does this id name a real symbol?
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 >= 0
    }

    /// Index into a symbol table, `None` when unassigned.
    #[must_use]
    pub const fn as_index(self) -> Option<usize> {
        if self.is_assigned() {
            Some(self.0 as usize)
        } else {
            None
        }
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_assigned() {
            write!(f, "Symbol({})", self.0)
        } else {
            write!(f, "Symbol(unassigned)")
        }
    }
}
