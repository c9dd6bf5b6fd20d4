//! Match engine: the turn state machine.
//!
//! ```text
//!  Idle ──start──▶ Revealing ──preview over, cards settle face-down──▶ AwaitingFirst
//!                                                                        │      ▲
//!                                                         first judged   │      │ match
//!                                                                        ▼      │
//!                                                                   AwaitingSecond ──last pair──▶ Won
//!                                                                        │
//!                                                             mismatch   ▼
//!                                                                    Resolving ──cards settle──▶ AwaitingFirst
//! ```
//!
//! `give_up` returns any in-game phase to `Idle`; `finish` does the same
//! from `Won`.
//!
//! ## Timing
//!
//! A click turns its card face-up immediately. The judgment waits for the
//! flip animation to settle and then for the selection delay, so the click is
//! judged `flip_duration + selection_delay` after it happened. While any card
//! is turning, and while two selections are already in flight, further clicks
//! are refused (see [`MatchEngine::can_accept`]). That keeps judgments in
//! click order.
//!
//! Timers are never cancelled. Each deal, restore and give-up starts a new
//! generation, and timers from an older generation are dropped when they fire.

use std::time::Duration;

use log::{debug, info};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::events::{AudioCue, EngineEvent};
use super::state::{FirstSelection, Phase, TurnState};
use crate::cards::{Card, Grid};
use crate::core::{CardId, GameConfig, GameRng, PairPlacement, Timings};
use crate::error::StartError;
use crate::schedule::TimerQueue;

const FULL_VOLUME: f32 = 1.0;

/// What an engine timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    /// Deal preview is over: turn everything face-down.
    HideDeal,
    /// The deal's flip-down animation finished.
    DealSettled,
    /// A clicked card finished turning face-up.
    Revealed(CardId),
    /// Judgment delay for a clicked card is over.
    Judge(CardId),
    /// A mismatched card finished turning face-down.
    Hidden(CardId),
}

#[derive(Clone, Copy, Debug)]
struct EngineTimer {
    generation: u64,
    kind: TimerKind,
}

/// Turn state machine for one game at a time.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    grid: Option<Grid>,
    turn: TurnState,
    phase: Phase,
    timings: Timings,
    placement: PairPlacement,
    rng: GameRng,
    timers: TimerQueue<EngineTimer>,
    generation: u64,
    /// Cards whose flip animation is running.
    turning: FxHashSet<CardId>,
    /// Clicked cards waiting for their judgment.
    in_flight: SmallVec<[CardId; 2]>,
    events: Vec<EngineEvent>,
}

impl MatchEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new(timings: Timings, placement: PairPlacement, rng: GameRng) -> Self {
        Self {
            grid: None,
            turn: TurnState::default(),
            phase: Phase::Idle,
            timings,
            placement,
            rng,
            timers: TimerQueue::new(),
            generation: 0,
            turning: FxHashSet::default(),
            in_flight: SmallVec::new(),
            events: Vec::new(),
        }
    }

    // === Accessors ===

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current grid, if one was ever dealt or restored.
    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Cards of the current grid; empty before the first deal.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        self.grid.as_ref().map(Grid::cards).unwrap_or_default()
    }

    /// Row count of the current grid.
    #[must_use]
    pub fn rows(&self) -> Option<u8> {
        self.grid.as_ref().map(Grid::rows)
    }

    /// Column count of the current grid.
    #[must_use]
    pub fn cols(&self) -> Option<u8> {
        self.grid.as_ref().map(Grid::cols)
    }

    /// Counters of the current game.
    #[must_use]
    pub fn turn_state(&self) -> &TurnState {
        &self.turn
    }

    /// Completed rounds.
    #[must_use]
    pub fn turns(&self) -> u32 {
        self.turn.turns
    }

    /// Consecutive matches.
    #[must_use]
    pub fn combo(&self) -> u32 {
        self.turn.combo
    }

    /// Cards not matched yet.
    #[must_use]
    pub fn cards_remaining(&self) -> u32 {
        self.turn.cards_remaining
    }

    /// Is a game running?
    #[must_use]
    pub fn game_active(&self) -> bool {
        self.turn.game_active
    }

    /// First card of the turn in progress.
    #[must_use]
    pub fn first_selection(&self) -> Option<FirstSelection> {
        self.turn.first_selection
    }

    /// Play time of the current game.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.turn.elapsed
    }

    /// Is the card's flip animation running?
    #[must_use]
    pub fn is_turning(&self, card: CardId) -> bool {
        self.turning.contains(&card)
    }

    /// Take the events raised since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // === Commands ===

    /// Deal a new game and start the face-up preview.
    ///
    /// Refused while a game is running, and when the symbol set is too small
    /// for the grid; nothing changes in either case.
    pub fn start(&mut self, config: GameConfig, symbol_count: usize) -> Result<(), StartError> {
        if self.phase.is_in_game() {
            return Err(StartError::GameInProgress);
        }
        let grid = Grid::deal(config, symbol_count, self.placement, &mut self.rng)?;

        self.begin_generation();
        self.turn = TurnState::fresh(grid.len());
        self.phase = Phase::Revealing;
        self.events.push(EngineEvent::Dealt { cards: grid.len() });
        self.grid = Some(grid);
        self.schedule(self.timings.reveal_delay(), TimerKind::HideDeal);

        info!(
            "game started: {}x{}, {} cards",
            config.rows(),
            config.cols(),
            self.turn.cards_remaining
        );
        Ok(())
    }

    /// Would a click on `card` be taken right now?
    ///
    /// True only when the engine is waiting for a pick, no card is turning,
    /// fewer than two picks are in flight, and the card is in play and
    /// face-down. Input dispatch should consult this before forwarding.
    #[must_use]
    pub fn can_accept(&self, card: CardId) -> bool {
        let selections = self.in_flight.len() + usize::from(self.turn.first_selection.is_some());
        self.phase.takes_clicks()
            && self.turning.is_empty()
            && selections < 2
            && self
                .grid
                .as_ref()
                .and_then(|grid| grid.card(card))
                .is_some_and(Card::is_selectable)
    }

    /// Handle a click. Returns whether it was taken.
    pub fn click(&mut self, card: CardId) -> bool {
        if !self.can_accept(card) {
            debug!("click on {card} ignored in {:?}", self.phase);
            return false;
        }
        self.start_flip(card, true);
        self.in_flight.push(card);
        self.schedule(self.timings.flip_duration(), TimerKind::Revealed(card));
        debug!("click on {card} taken");
        true
    }

    /// Abandon the running game. The grid stays as it is.
    pub fn give_up(&mut self) {
        if !self.phase.is_in_game() {
            return;
        }
        self.stop_game();
        self.events.push(EngineEvent::GaveUp);
        info!("game abandoned after {} turns", self.turn.turns);
    }

    /// Leave the win screen.
    pub fn finish(&mut self) {
        if self.phase == Phase::Won {
            self.phase = Phase::Idle;
        }
    }

    /// Replace whatever is running with a restored game.
    ///
    /// Flip and active flags are taken from `grid` as they are. A recorded
    /// first selection is dropped because saved cards are face-down, so an
    /// in-game restore resumes at `AwaitingFirst`; anything else lands in
    /// `Idle`.
    pub fn resume(&mut self, grid: Grid, mut turn: TurnState) {
        self.begin_generation();
        turn.first_selection = None;
        self.phase = if turn.game_active {
            Phase::AwaitingFirst
        } else {
            Phase::Idle
        };
        self.turn = turn;
        self.grid = Some(grid);
        self.events.push(EngineEvent::Restored {
            in_game: self.turn.game_active,
        });
    }

    /// Run the clock forward, firing every timer that comes due.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.turn.game_active {
            self.turn.elapsed += elapsed;
        }
        let until = self.timers.now() + elapsed;
        while let Some(timer) = self.timers.pop_due(until) {
            if timer.generation == self.generation {
                self.fire(timer.kind);
            }
        }
        self.timers.settle(until);
    }

    // === Internals ===

    fn begin_generation(&mut self) {
        self.generation += 1;
        self.turning.clear();
        self.in_flight.clear();
    }

    fn stop_game(&mut self) {
        self.begin_generation();
        self.turn.game_active = false;
        self.turn.first_selection = None;
        self.phase = Phase::Idle;
    }

    fn schedule(&mut self, delay: Duration, kind: TimerKind) {
        let timer = EngineTimer {
            generation: self.generation,
            kind,
        };
        self.timers.schedule(delay, timer);
    }

    fn start_flip(&mut self, card: CardId, face_up: bool) {
        if let Some(c) = self.grid.as_mut().and_then(|g| g.card_mut(card)) {
            c.set_flipped(face_up);
        }
        self.turning.insert(card);
        self.events.push(EngineEvent::FlipStarted { card, face_up });
        self.audio(AudioCue::Flip, FULL_VOLUME);
    }

    fn settle_flip(&mut self, card: CardId) {
        if self.turning.remove(&card) {
            self.events.push(EngineEvent::FlipSettled { card });
        }
    }

    fn audio(&mut self, cue: AudioCue, volume: f32) {
        self.events.push(EngineEvent::Audio { cue, volume });
    }

    fn fire(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::HideDeal => self.hide_deal(),
            TimerKind::DealSettled => {
                let ids: Vec<CardId> = self.cards().iter().map(Card::id).collect();
                for card in ids {
                    self.settle_flip(card);
                }
                self.phase = Phase::AwaitingFirst;
            }
            TimerKind::Revealed(card) => {
                self.settle_flip(card);
                self.schedule(self.timings.selection_delay(), TimerKind::Judge(card));
            }
            TimerKind::Judge(card) => self.judge(card),
            TimerKind::Hidden(card) => {
                self.settle_flip(card);
                if self.phase == Phase::Resolving && self.turning.is_empty() {
                    self.phase = Phase::AwaitingFirst;
                }
            }
        }
    }

    fn hide_deal(&mut self) {
        let ids: Vec<CardId> = self.cards().iter().map(Card::id).collect();
        for id in ids {
            self.start_flip(id, false);
        }
        self.schedule(self.timings.flip_duration(), TimerKind::DealSettled);
    }

    fn judge(&mut self, card: CardId) {
        self.in_flight.retain(|c| *c != card);
        let Some(symbol) = self.grid.as_ref().and_then(|g| g.card(card)).map(Card::symbol) else {
            return;
        };

        match self.turn.first_selection {
            None => {
                self.turn.first_selection = Some(FirstSelection { symbol, card });
                self.phase = Phase::AwaitingSecond;
            }
            Some(first) => {
                self.turn.first_selection = None;
                self.turn.turns = self.turn.turns.saturating_add(1);
                if first.symbol == symbol {
                    self.resolve_match(first.card, card);
                } else {
                    self.resolve_mismatch(first.card, card);
                }
            }
        }
    }

    fn resolve_match(&mut self, first: CardId, second: CardId) {
        if let Some(grid) = self.grid.as_mut() {
            for id in [first, second] {
                if let Some(card) = grid.card_mut(id) {
                    card.set_active(false);
                }
            }
        }
        self.turn.cards_remaining = self.turn.cards_remaining.saturating_sub(2);
        self.turn.combo = self.turn.combo.saturating_add(1);
        self.events.push(EngineEvent::Matched { first, second });
        debug!(
            "match {first}/{second}: combo {}, {} cards left",
            self.turn.combo, self.turn.cards_remaining
        );

        if self.turn.cards_remaining == 0 {
            self.turn.game_active = false;
            self.phase = Phase::Won;
            self.audio(AudioCue::Win, FULL_VOLUME);
            self.events.push(EngineEvent::Won {
                turns: self.turn.turns,
            });
            info!("game won in {} turns", self.turn.turns);
        } else {
            self.audio(AudioCue::Match, FULL_VOLUME);
            self.phase = Phase::AwaitingFirst;
        }
    }

    fn resolve_mismatch(&mut self, first: CardId, second: CardId) {
        self.turn.combo = 0;
        self.phase = Phase::Resolving;
        for id in [first, second] {
            self.start_flip(id, false);
            self.schedule(self.timings.flip_duration(), TimerKind::Hidden(id));
        }
        self.audio(AudioCue::Mismatch, self.timings.mismatch_volume);
        self.events.push(EngineEvent::Mismatched { first, second });
        debug!("mismatch {first}/{second}");
    }
}
