//! The session: one engine, one save manager, and the command surface the
//! UI layer drives.

use std::time::Duration;

use log::{debug, info, warn};

use super::collab::{AudioSink, SymbolAtlas};
use crate::cards::Card;
use crate::core::{CardId, GameConfig, GameRng, SessionConfig};
use crate::error::{LoadError, SaveError, StartError, StoreError};
use crate::persist::{KeyValueStore, SaveManager};
use crate::rules::{EngineEvent, MatchEngine, Phase};
use crate::schedule::TimerQueue;

/// Events kept for [`Session::drain_events`]; older ones are dropped first.
pub const EVENT_BACKLOG: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionTimer {
    AutoSave,
}

/// A running game session.
///
/// Owns the match engine and the save manager, forwards sound cues to the
/// audio sink, and keeps the auto-save timer. Time only moves when the host
/// calls [`Session::advance`].
///
/// ```
/// use std::time::Duration;
/// use card_match::core::SessionConfig;
/// use card_match::persist::MemoryStore;
/// use card_match::session::{EmojiAtlas, NullAudio, Session};
///
/// let config = SessionConfig::new().with_seed(3);
/// let mut session = Session::new(config, EmojiAtlas::new(), NullAudio, MemoryStore::new());
///
/// session.start_game(4, 4).unwrap();
/// assert_eq!(session.cards_remaining(), 16);
///
/// // Preview, then the cards turn face-down.
/// session.advance(Duration::from_millis(800));
/// assert!(session.can_accept(card_match::core::CardId::new(0)));
/// ```
pub struct Session<Y, A, S> {
    config: SessionConfig,
    engine: MatchEngine,
    saves: SaveManager<S>,
    atlas: Y,
    audio: A,
    timers: TimerQueue<SessionTimer>,
    events: Vec<EngineEvent>,
}

impl<Y: SymbolAtlas, A: AudioSink, S: KeyValueStore> Session<Y, A, S> {
    /// Create an idle session. Auto-save starts right away when the config
    /// asks for it.
    pub fn new(config: SessionConfig, atlas: Y, audio: A, store: S) -> Self {
        let rng = GameRng::from_optional_seed(config.seed);
        let engine = MatchEngine::new(config.timings, config.placement, rng);
        let mut session = Self {
            config,
            engine,
            saves: SaveManager::new(store),
            atlas,
            audio,
            timers: TimerQueue::new(),
            events: Vec::new(),
        };
        if let Some(interval) = session.config.auto_save_interval() {
            session.enable_auto_save(interval);
        }
        session
    }

    // === Commands ===

    /// Deal a new `rows` x `cols` game.
    pub fn start_game(&mut self, rows: u8, cols: u8) -> Result<(), StartError> {
        let result = GameConfig::new(rows, cols)
            .and_then(|config| self.engine.start(config, self.atlas.symbol_count()));
        if let Err(err) = &result {
            warn!("start refused: {err}");
        }
        self.dispatch();
        result
    }

    /// Forward a card click. Returns whether it was taken.
    pub fn on_card_clicked(&mut self, card: CardId) -> bool {
        let accepted = self.engine.click(card);
        self.dispatch();
        accepted
    }

    /// Would a click on `card` be taken right now?
    #[must_use]
    pub fn can_accept(&self, card: CardId) -> bool {
        self.engine.can_accept(card)
    }

    /// Abandon the running game. The save record is kept.
    pub fn give_up(&mut self) {
        self.engine.give_up();
        self.dispatch();
    }

    /// Leave the win screen.
    pub fn finish(&mut self) {
        self.engine.finish();
    }

    /// Save the current game.
    pub fn save_game(&mut self) -> Result<(), SaveError> {
        match self.saves.save(&self.engine) {
            Ok(()) => {
                info!("game saved");
                Ok(())
            }
            Err(err) => {
                warn!("save failed: {err}");
                Err(err)
            }
        }
    }

    /// Replace the current game with the saved one.
    ///
    /// On any failure the current game carries on untouched.
    pub fn load_game(&mut self) -> Result<(), LoadError> {
        let (grid, turn) = match self.saves.load(self.atlas.symbol_count()) {
            Ok(restored) => restored,
            Err(err) => {
                warn!("load failed: {err}");
                return Err(err);
            }
        };
        info!(
            "game loaded: {}x{}, {} cards remaining",
            grid.rows(),
            grid.cols(),
            turn.cards_remaining
        );
        self.engine.resume(grid, turn);
        self.dispatch();
        Ok(())
    }

    /// Remove the save record.
    pub fn delete_save(&mut self) -> Result<(), StoreError> {
        self.saves.delete()
    }

    /// Is there a record to load? A failing store counts as "no".
    #[must_use]
    pub fn has_save_data(&self) -> bool {
        self.saves.has_save_data().unwrap_or_else(|err| {
            warn!("save check failed: {err}");
            false
        })
    }

    /// Save every `interval` while a game is running.
    ///
    /// The timer lives as long as the session. Calling this again adds
    /// another timer next to the first.
    pub fn enable_auto_save(&mut self, interval: Duration) {
        self.timers.schedule_repeating(interval, SessionTimer::AutoSave);
        debug!("auto-save every {interval:?}");
    }

    /// Move time forward by one frame.
    pub fn advance(&mut self, elapsed: Duration) {
        self.engine.advance(elapsed);
        self.dispatch();

        for timer in self.timers.advance(elapsed) {
            match timer {
                SessionTimer::AutoSave => self.auto_save(),
            }
        }
    }

    /// Take the events raised since the last call.
    ///
    /// At most [`EVENT_BACKLOG`] are kept. A host that never drains only
    /// loses the oldest ones.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // === Accessors ===

    /// Configuration the session was built with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying engine.
    #[must_use]
    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// The save manager and its store.
    #[must_use]
    pub fn saves(&self) -> &SaveManager<S> {
        &self.saves
    }

    pub fn atlas(&self) -> &Y {
        &self.atlas
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    #[must_use]
    pub fn rows(&self) -> Option<u8> {
        self.engine.rows()
    }

    #[must_use]
    pub fn cols(&self) -> Option<u8> {
        self.engine.cols()
    }

    #[must_use]
    pub fn turns(&self) -> u32 {
        self.engine.turns()
    }

    #[must_use]
    pub fn combo(&self) -> u32 {
        self.engine.combo()
    }

    #[must_use]
    pub fn cards_remaining(&self) -> u32 {
        self.engine.cards_remaining()
    }

    #[must_use]
    pub fn game_active(&self) -> bool {
        self.engine.game_active()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.engine.elapsed()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        self.engine.cards()
    }

    /// What `card` shows right now: its face when turned up, the back
    /// otherwise. `None` for an unknown card or a face the atlas lacks.
    #[must_use]
    pub fn face_visual(&self, card: CardId) -> Option<&Y::Visual> {
        let card = self.engine.grid()?.card(card)?;
        if card.is_flipped() && card.symbol().is_assigned() {
            self.atlas.symbol_visual(card.symbol())
        } else {
            Some(self.atlas.back_visual())
        }
    }

    // === Internals ===

    fn dispatch(&mut self) {
        for event in self.engine.drain_events() {
            match &event {
                EngineEvent::Audio { cue, volume } => self.audio.on_audio_cue(*cue, *volume),
                EngineEvent::Won { .. } => {
                    if let Err(err) = self.saves.delete() {
                        warn!("could not clear save after win: {err}");
                    }
                }
                _ => {}
            }
            self.events.push(event);
        }
        if self.events.len() > EVENT_BACKLOG {
            let overflow = self.events.len() - EVENT_BACKLOG;
            self.events.drain(..overflow);
        }
    }

    fn auto_save(&mut self) {
        if !self.engine.game_active() {
            return;
        }
        debug!("auto-save tick");
        if let Err(err) = self.saves.save(&self.engine) {
            warn!("auto-save failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Timings;
    use crate::persist::{MemoryStore, SAVE_KEY};
    use crate::rules::AudioCue;
    use crate::session::{EmojiAtlas, NullAudio};

    #[derive(Default)]
    struct Recorder(Vec<(AudioCue, f32)>);

    impl AudioSink for Recorder {
        fn on_audio_cue(&mut self, cue: AudioCue, volume: f32) {
            self.0.push((cue, volume));
        }
    }

    fn quiet_config() -> SessionConfig {
        SessionConfig::new()
            .with_seed(21)
            .with_timings(Timings::instant())
            .with_auto_save(None)
    }

    fn session() -> Session<EmojiAtlas, Recorder, MemoryStore> {
        Session::new(quiet_config(), EmojiAtlas::new(), Recorder::default(), MemoryStore::new())
    }

    #[test]
    fn test_start_game_forwards_flip_cues() {
        let mut session = session();
        session.start_game(2, 2).unwrap();
        session.advance(Duration::ZERO);

        let flips = session.audio().0.iter().filter(|(c, _)| *c == AudioCue::Flip).count();
        assert_eq!(flips, 4);
        assert_eq!(session.phase(), Phase::AwaitingFirst);
    }

    #[test]
    fn test_start_game_rejects_bad_size() {
        let mut session = session();
        assert_eq!(
            session.start_game(7, 2),
            Err(StartError::InvalidDimensions { rows: 7, cols: 2 })
        );
        assert_eq!(session.rows(), None);
    }

    #[test]
    fn test_start_game_needs_symbols() {
        let mut session = Session::new(quiet_config(), EmojiAtlas::with_limit(5), NullAudio, MemoryStore::new());
        assert_eq!(
            session.start_game(4, 4),
            Err(StartError::NotEnoughSymbols { needed: 8, available: 5 })
        );
        assert!(session.cards().is_empty());
    }

    #[test]
    fn test_face_visual() {
        let mut session = session();
        session.start_game(2, 2).unwrap();

        let id = CardId::new(0);
        let symbol = session.cards()[0].symbol();
        let face = session.atlas().symbol_visual(symbol).unwrap();
        assert_eq!(session.face_visual(id), Some(face));

        session.advance(Duration::ZERO);
        assert_eq!(session.face_visual(id), Some("🂠"));
        assert_eq!(session.face_visual(CardId::new(9)), None);
    }

    #[test]
    fn test_auto_save_only_while_active() {
        let config = quiet_config().with_auto_save(Some(Duration::from_secs(30)));
        let mut session = Session::new(config, EmojiAtlas::new(), NullAudio, MemoryStore::new());

        session.advance(Duration::from_secs(30));
        assert!(!session.has_save_data());

        session.start_game(3, 4).unwrap();
        session.advance(Duration::from_secs(29));
        assert!(!session.has_save_data());
        session.advance(Duration::from_secs(1));
        assert!(session.has_save_data());
    }

    #[test]
    fn test_auto_save_skips_after_give_up() {
        let mut session = Session::new(quiet_config(), EmojiAtlas::new(), NullAudio, MemoryStore::new());
        session.enable_auto_save(Duration::from_secs(5));
        session.start_game(2, 2).unwrap();
        session.give_up();

        session.advance(Duration::from_secs(10));
        assert!(!session.saves().store().contains(SAVE_KEY).unwrap());
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut session = session();
        for _ in 0..100 {
            session.start_game(2, 2).unwrap();
            session.advance(Duration::ZERO);
            session.give_up();
        }

        let events = session.drain_events();
        assert_eq!(events.len(), EVENT_BACKLOG);
        assert_eq!(events.last(), Some(&EngineEvent::GaveUp));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_save_before_any_game() {
        let mut session = session();
        assert!(matches!(session.save_game(), Err(SaveError::NothingToSave)));
    }
}
