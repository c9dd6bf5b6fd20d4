//! Turn state and engine phases.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{CardId, SymbolId};

/// Where the match engine is in a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No game running.
    #[default]
    Idle,
    /// Fresh deal shown face-up; flips face-down on its own.
    Revealing,
    /// Waiting for the first card of a turn.
    AwaitingFirst,
    /// One card is recorded, waiting for its partner.
    AwaitingSecond,
    /// A mismatched pair is turning back face-down.
    Resolving,
    /// Every pair found.
    Won,
}

impl Phase {
    /// Is a game in progress (dealt and not yet won or abandoned)?
    #[must_use]
    pub fn is_in_game(self) -> bool {
        matches!(
            self,
            Phase::Revealing | Phase::AwaitingFirst | Phase::AwaitingSecond | Phase::Resolving
        )
    }

    /// Does this phase take card clicks at all?
    #[must_use]
    pub fn takes_clicks(self) -> bool {
        matches!(self, Phase::AwaitingFirst | Phase::AwaitingSecond)
    }
}

/// The card recorded as the first half of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirstSelection {
    pub symbol: SymbolId,
    pub card: CardId,
}

/// Counters of the current game. Reset on every deal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// First card of the turn in progress.
    pub first_selection: Option<FirstSelection>,
    /// Completed two-card rounds.
    pub turns: u32,
    /// Consecutive matches since the last mismatch.
    pub combo: u32,
    /// Cards not matched yet.
    pub cards_remaining: u32,
    /// Dealt and not yet won or abandoned.
    pub game_active: bool,
    /// Play time accumulated while the game was active.
    pub elapsed: Duration,
}

impl TurnState {
    /// Counters for a fresh deal of `card_count` cards.
    #[must_use]
    pub fn fresh(card_count: usize) -> Self {
        Self {
            first_selection: None,
            turns: 0,
            combo: 0,
            cards_remaining: card_count as u32,
            game_active: true,
            elapsed: Duration::ZERO,
        }
    }
}
