//! Grid and grid allocator.
//!
//! The grid owns every card of a game. Dealing a grid runs in three steps:
//!
//! 1. **Size**: `rows * cols` cells, minus one when the total is odd so every
//!    symbol can pair up. The deal is refused outright when there are fewer
//!    distinct symbols than pairs.
//! 2. **Pick**: draw one symbol per pair (see [`pick_symbols`]).
//! 3. **Place**: put each symbol on two empty cells (see [`PairPlacement`]).
//!
//! Fresh cards are active and face-down; dealing a symbol turns the card
//! face-up for the preview, so a new grid starts fully revealed.

use log::debug;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::layout::{slot_positions, Slot};
use crate::core::{CardId, GameConfig, GameRng, PairPlacement, SymbolId};
use crate::error::StartError;

/// The cards of one game, in id order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    config: GameConfig,
    cards: Vec<Card>,
}

impl Grid {
    /// Create a grid of active, face-down cards without symbols.
    #[must_use]
    pub fn blank(config: GameConfig) -> Self {
        let cards = CardId::all(config.usable_cells()).map(Card::new).collect();
        Self { config, cards }
    }

    /// Deal a new grid.
    ///
    /// Fails without building anything when `symbol_count` is smaller than
    /// the number of pairs the grid needs.
    ///
    /// ```
    /// use card_match::cards::Grid;
    /// use card_match::core::{GameConfig, GameRng, PairPlacement};
    ///
    /// let config = GameConfig::new(4, 4).unwrap();
    /// let mut rng = GameRng::new(1);
    ///
    /// let grid = Grid::deal(config, 8, PairPlacement::LinearProbe, &mut rng).unwrap();
    /// assert_eq!(grid.len(), 16);
    /// assert!(grid.cards().iter().all(|c| c.is_flipped()));
    ///
    /// assert!(Grid::deal(config, 7, PairPlacement::LinearProbe, &mut rng).is_err());
    /// ```
    pub fn deal(
        config: GameConfig,
        symbol_count: usize,
        placement: PairPlacement,
        rng: &mut GameRng,
    ) -> Result<Self, StartError> {
        config.check_symbols(symbol_count)?;

        let mut grid = Self::blank(config);
        let symbols = pick_symbols(config.pairs_needed(), symbol_count, rng);
        match placement {
            PairPlacement::LinearProbe => place_linear_probe(&mut grid.cards, &symbols, rng),
            PairPlacement::Shuffled => place_shuffled(&mut grid.cards, &symbols, rng),
        }

        debug!(
            "dealt {}x{} grid: {} cards, {} pairs, {:?}",
            config.rows(),
            config.cols(),
            grid.cards.len(),
            symbols.len(),
            placement
        );
        Ok(grid)
    }

    /// Grid dimensions.
    #[must_use]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u8 {
        self.config.rows()
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u8 {
        self.config.cols()
    }

    /// All cards in id order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True for a grid without cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Look up a card for mutation.
    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id.index())
    }

    /// Iterate mutably over all cards.
    pub fn cards_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut()
    }

    /// Cards still in play.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_active()).count()
    }

    /// Map every card to its grid cell.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.cards
            .iter()
            .zip(slot_positions(self.config))
            .map(|(card, (row, col))| Slot { card: card.id(), row, col })
    }
}

/// Choose the symbol for each of `pairs` pairs out of `available` symbols.
///
/// Each pick is a uniform draw; on a collision the pick walks forward
/// (`+1 mod available`) until it is neither the immediately preceding pick
/// nor already used in the current round. A round lasts `available` picks,
/// after which every symbol becomes eligible again, so asking for more pairs
/// than symbols reuses symbols round-robin instead of failing.
///
/// Returns an empty list when no symbols are available.
pub fn pick_symbols(pairs: usize, available: usize, rng: &mut GameRng) -> Vec<SymbolId> {
    if available == 0 {
        return Vec::new();
    }

    let mut picks: Vec<usize> = Vec::with_capacity(pairs);
    let mut used = vec![false; available];
    let mut used_in_round = 0;

    for _ in 0..pairs {
        if used_in_round == available {
            used.iter_mut().for_each(|u| *u = false);
            used_in_round = 0;
        }

        let previous = picks.last().copied();
        let mut value = rng.below(available);
        while used[value] || (available > 1 && previous == Some(value)) {
            value = (value + 1) % available;
        }

        used[value] = true;
        used_in_round += 1;
        picks.push(value);
    }

    picks.into_iter().map(|v| SymbolId::new(v as i32)).collect()
}

/// Two cards per symbol: random start cell, probe forward past taken cells.
fn place_linear_probe(cards: &mut [Card], symbols: &[SymbolId], rng: &mut GameRng) {
    let len = cards.len();
    for &symbol in symbols {
        for _ in 0..2 {
            let mut slot = rng.below(len);
            while cards[slot].symbol().is_assigned() {
                slot = (slot + 1) % len;
            }
            cards[slot].deal_symbol(symbol);
        }
    }
}

/// Two cards per symbol, uniformly permuted.
fn place_shuffled(cards: &mut [Card], symbols: &[SymbolId], rng: &mut GameRng) {
    let mut faces: Vec<SymbolId> = symbols.iter().flat_map(|&s| [s, s]).collect();
    rng.shuffle(&mut faces);
    for (card, symbol) in cards.iter_mut().zip(faces) {
        card.deal_symbol(symbol);
    }
}
