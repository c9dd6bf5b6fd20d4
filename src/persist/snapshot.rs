//! The persisted game record.
//!
//! A `SaveSnapshot` is a self-contained copy of the grid and the turn
//! counters. It is plain serde data; the JSON produced for it looks like:
//!
//! ```json
//! {
//!   "version": 1,
//!   "rows": 2, "cols": 2,
//!   "turns": 1, "combo": 1, "cards_remaining": 2, "game_active": true,
//!   "first_selection": null,
//!   "elapsed_ms": 5200,
//!   "cards": [
//!     { "symbol_id": 0, "card_id": 0, "is_active": false, "is_flipped": true },
//!     ...
//!   ]
//! }
//! ```
//!
//! ## Flip normalisation
//!
//! Flip state is never copied as-is. On capture every card still in play is
//! written face-down and every matched card face-up, whatever animation it
//! was in the middle of. A restored game therefore always starts visually
//! consistent.

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::Grid;
use crate::core::{CardId, GameConfig, SymbolId};
use crate::error::LoadError;
use crate::rules::{FirstSelection, MatchEngine, TurnState};

/// Record layout version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One card in the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub symbol_id: SymbolId,
    pub card_id: CardId,
    pub is_active: bool,
    pub is_flipped: bool,
}

/// Point-in-time copy of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub version: u32,
    pub rows: u8,
    pub cols: u8,
    pub turns: u32,
    pub combo: u32,
    pub cards_remaining: u32,
    pub game_active: bool,
    pub first_selection: Option<FirstSelection>,
    #[serde(default)]
    pub elapsed_ms: u64,
    pub cards: Vec<CardRecord>,
}

impl SaveSnapshot {
    /// Copy the engine's current game. `None` before anything was dealt.
    #[must_use]
    pub fn capture(engine: &MatchEngine) -> Option<Self> {
        let grid = engine.grid()?;
        let turn = engine.turn_state();

        let cards = grid
            .cards()
            .iter()
            .map(|card| CardRecord {
                symbol_id: card.symbol(),
                card_id: card.id(),
                is_active: card.is_active(),
                is_flipped: !card.is_active(),
            })
            .collect();

        Some(Self {
            version: SNAPSHOT_VERSION,
            rows: grid.rows(),
            cols: grid.cols(),
            turns: turn.turns,
            combo: turn.combo,
            cards_remaining: turn.cards_remaining,
            game_active: turn.game_active,
            first_selection: turn.first_selection,
            elapsed_ms: u64::try_from(turn.elapsed.as_millis()).unwrap_or(u64::MAX),
            cards,
        })
    }

    /// Rebuild the grid and counters, checking the record first.
    ///
    /// `symbol_count` is the number of symbols the caller can display; every
    /// card must use one of them. Nothing is built unless the whole record is
    /// consistent.
    pub fn restore(&self, symbol_count: usize) -> Result<(Grid, TurnState), LoadError> {
        self.validate(symbol_count)?;
        let config = GameConfig::new(self.rows, self.cols).map_err(corrupt)?;

        let mut grid = Grid::blank(config);
        for (card, record) in grid.cards_mut().zip(&self.cards) {
            card.set_symbol(record.symbol_id);
            card.set_active(record.is_active);
            card.set_flipped(record.is_flipped);
        }

        let turn = TurnState {
            first_selection: self.first_selection,
            turns: self.turns,
            combo: self.combo,
            cards_remaining: self.cards_remaining,
            game_active: self.game_active,
            elapsed: Duration::from_millis(self.elapsed_ms),
        };
        Ok((grid, turn))
    }

    fn validate(&self, symbol_count: usize) -> Result<(), LoadError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(LoadError::Corrupt(format!(
                "unsupported version {}",
                self.version
            )));
        }
        let config = GameConfig::new(self.rows, self.cols).map_err(corrupt)?;

        if self.cards.len() != config.usable_cells() {
            return Err(LoadError::Corrupt(format!(
                "{}x{} grid needs {} cards, record has {}",
                self.rows,
                self.cols,
                config.usable_cells(),
                self.cards.len()
            )));
        }

        for (index, record) in self.cards.iter().enumerate() {
            if record.card_id.index() != index {
                return Err(LoadError::Corrupt(format!(
                    "card at position {index} has id {}",
                    record.card_id
                )));
            }
            match record.symbol_id.as_index() {
                Some(symbol) if symbol < symbol_count => {}
                _ => {
                    return Err(LoadError::Corrupt(format!(
                        "{} has unusable symbol {}",
                        record.card_id, record.symbol_id
                    )))
                }
            }
            // Cards in play are stored face-down, matched ones face-up.
            if record.is_flipped == record.is_active {
                return Err(LoadError::Corrupt(format!(
                    "{} is {} but {}",
                    record.card_id,
                    if record.is_active { "in play" } else { "matched" },
                    if record.is_flipped { "face-up" } else { "face-down" }
                )));
            }
        }

        let mut in_play: FxHashMap<SymbolId, usize> = FxHashMap::default();
        for record in self.cards.iter().filter(|c| c.is_active) {
            *in_play.entry(record.symbol_id).or_insert(0) += 1;
        }
        if let Some((symbol, count)) = in_play.iter().find(|(_, &count)| count % 2 != 0) {
            return Err(LoadError::Corrupt(format!(
                "{symbol} is on {count} cards in play and can never be cleared"
            )));
        }

        let active = self.cards.iter().filter(|c| c.is_active).count();
        if self.cards_remaining as usize != active {
            return Err(LoadError::Corrupt(format!(
                "cards_remaining is {} but {active} cards are active",
                self.cards_remaining
            )));
        }
        if self.game_active && active == 0 {
            return Err(LoadError::Corrupt(
                "game marked active without cards in play".to_string(),
            ));
        }
        if let Some(first) = self.first_selection {
            if first.card.index() >= self.cards.len() {
                return Err(LoadError::Corrupt(format!(
                    "first selection {} is outside the grid",
                    first.card
                )));
            }
        }
        Ok(())
    }
}

fn corrupt(err: impl std::fmt::Display) -> LoadError {
    LoadError::Corrupt(err.to_string())
}
