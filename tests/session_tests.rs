//! Session integration tests.
//!
//! The command surface as the UI layer drives it: real timings, audio cues,
//! auto-save and the save lifecycle around wins and give-ups.

use std::time::Duration;

use card_match::core::{CardId, SessionConfig, SymbolId};
use card_match::persist::{KeyValueStore, MemoryStore, SAVE_KEY};
use card_match::rules::{AudioCue, Phase};
use card_match::session::{AudioSink, Session, SymbolAtlas};
use card_match::StartError;

#[derive(Default)]
struct Recorder {
    cues: Vec<(AudioCue, f32)>,
}

impl Recorder {
    fn count(&self, cue: AudioCue) -> usize {
        self.cues.iter().filter(|(c, _)| *c == cue).count()
    }
}

impl AudioSink for Recorder {
    fn on_audio_cue(&mut self, cue: AudioCue, volume: f32) {
        self.cues.push((cue, volume));
    }
}

/// Eight plain labels, so a 4x4 deal uses every one.
struct EightSymbols;

impl SymbolAtlas for EightSymbols {
    type Visual = str;

    fn symbol_count(&self) -> usize {
        8
    }

    fn symbol_visual(&self, symbol: SymbolId) -> Option<&str> {
        const NAMES: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];
        symbol.as_index().and_then(|i| NAMES.get(i)).copied()
    }

    fn back_visual(&self) -> &str {
        "?"
    }
}

type TestSession = Session<EightSymbols, Recorder, MemoryStore>;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn session(config: SessionConfig) -> TestSession {
    Session::new(config, EightSymbols, Recorder::default(), MemoryStore::new())
}

fn partner_of(session: &TestSession, card: CardId) -> CardId {
    let symbol = session.cards()[card.index()].symbol();
    session
        .cards()
        .iter()
        .find(|c| c.id() != card && c.symbol() == symbol)
        .map(|c| c.id())
        .unwrap()
}

/// Click, then wait out the flip and the judgment delay.
fn pick(session: &mut TestSession, card: CardId) {
    assert!(session.on_card_clicked(card), "{card} refused in {:?}", session.phase());
    session.advance(ms(1000));
}

// =============================================================================
// The 4x4 walk-through
// =============================================================================

#[test]
fn test_four_by_four_walkthrough() {
    let mut session = session(SessionConfig::new().with_seed(8).with_auto_save(None));

    session.start_game(4, 4).unwrap();
    assert_eq!(session.cards().len(), 16);
    assert_eq!(session.cards_remaining(), 16);
    let mut symbols: Vec<_> = session.cards().iter().map(|c| c.symbol()).collect();
    symbols.sort();
    symbols.dedup();
    assert_eq!(symbols.len(), 8);

    // Reveal delay, then the flip down settles.
    session.advance(ms(300));
    assert!(session.cards().iter().all(|c| !c.is_flipped()));
    session.advance(ms(500));
    assert_eq!(session.phase(), Phase::AwaitingFirst);

    // Card 0 and a card with another symbol.
    let zero_symbol = session.cards()[0].symbol();
    let miss = session.cards().iter().find(|c| c.symbol() != zero_symbol).unwrap().id();
    pick(&mut session, CardId::new(0));
    pick(&mut session, miss);
    session.advance(ms(500));

    assert_eq!(session.turns(), 1);
    assert_eq!(session.combo(), 0);
    assert!(!session.cards()[0].is_flipped());
    assert!(!session.cards()[miss.index()].is_flipped());

    // Now a real pair.
    let partner = partner_of(&session, CardId::new(0));
    pick(&mut session, CardId::new(0));
    pick(&mut session, partner);

    assert_eq!(session.turns(), 2);
    assert_eq!(session.combo(), 1);
    assert_eq!(session.cards_remaining(), 14);
    assert!(!session.cards()[0].is_active());
    assert!(!session.cards()[partner.index()].is_active());
}

#[test]
fn test_audio_cues_reach_sink() {
    let mut session = session(SessionConfig::new().with_seed(1).with_auto_save(None));
    session.start_game(2, 2).unwrap();
    session.advance(ms(800));
    assert_eq!(session.audio().count(AudioCue::Flip), 4);

    let zero_symbol = session.cards()[0].symbol();
    let miss = session.cards().iter().find(|c| c.symbol() != zero_symbol).unwrap().id();
    pick(&mut session, CardId::new(0));
    pick(&mut session, miss);
    session.advance(ms(500));
    assert_eq!(session.audio().count(AudioCue::Mismatch), 1);
    assert!(session
        .audio()
        .cues
        .iter()
        .any(|&(cue, volume)| cue == AudioCue::Mismatch && volume < 1.0));

    for _ in 0..2 {
        let a = session.cards().iter().find(|c| c.is_active()).unwrap().id();
        let b = partner_of(&session, a);
        pick(&mut session, a);
        pick(&mut session, b);
    }
    assert_eq!(session.audio().count(AudioCue::Match), 1);
    assert_eq!(session.audio().count(AudioCue::Win), 1);
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_start_refused_mid_game() {
    let mut session = session(SessionConfig::new().with_seed(2).with_auto_save(None));
    session.start_game(2, 2).unwrap();

    assert_eq!(session.start_game(4, 4), Err(StartError::GameInProgress));
    assert_eq!(session.rows(), Some(2));

    session.give_up();
    session.start_game(4, 4).unwrap();
    assert_eq!(session.rows(), Some(4));
}

#[test]
fn test_too_big_for_atlas() {
    let mut session = session(SessionConfig::new().with_auto_save(None));

    assert_eq!(
        session.start_game(5, 4),
        Err(StartError::NotEnoughSymbols { needed: 10, available: 8 })
    );
    assert!(session.cards().is_empty());
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn test_face_visual_follows_flips() {
    let mut session = session(SessionConfig::new().with_seed(4).with_auto_save(None));
    session.start_game(2, 2).unwrap();

    let id = CardId::new(1);
    let face = session
        .atlas()
        .symbol_visual(session.cards()[1].symbol())
        .unwrap()
        .to_string();
    assert_eq!(session.face_visual(id), Some(face.as_str()));

    session.advance(ms(800));
    assert_eq!(session.face_visual(id), Some("?"));

    session.on_card_clicked(id);
    assert_eq!(session.face_visual(id), Some(face.as_str()));
}

#[test]
fn test_can_accept_mirrors_click() {
    let mut session = session(SessionConfig::new().with_seed(6).with_auto_save(None));
    session.start_game(2, 4).unwrap();

    for frame in 0..200 {
        let card = CardId::new(frame % 8);
        let expected = session.can_accept(card);
        assert_eq!(session.on_card_clicked(card), expected);
        session.advance(ms(16));
    }
}

// =============================================================================
// Save lifecycle
// =============================================================================

#[test]
fn test_win_clears_save() {
    let mut session = session(SessionConfig::new().with_seed(3).with_auto_save(None));
    session.start_game(2, 2).unwrap();
    session.advance(ms(800));
    session.save_game().unwrap();
    assert!(session.has_save_data());

    for _ in 0..2 {
        let a = session.cards().iter().find(|c| c.is_active()).unwrap().id();
        let b = partner_of(&session, a);
        pick(&mut session, a);
        pick(&mut session, b);
    }

    assert_eq!(session.phase(), Phase::Won);
    assert!(!session.has_save_data());

    session.finish();
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn test_give_up_keeps_save() {
    let mut session = session(SessionConfig::new().with_seed(3).with_auto_save(None));
    session.start_game(2, 2).unwrap();
    session.save_game().unwrap();

    session.give_up();

    assert!(!session.game_active());
    assert!(session.has_save_data());
}

#[test]
fn test_default_auto_save_every_thirty_seconds() {
    let mut session = session(SessionConfig::new().with_seed(5));
    session.start_game(2, 4).unwrap();

    session.advance(Duration::from_secs(29));
    assert!(!session.has_save_data());

    session.advance(Duration::from_secs(1));
    assert!(session.has_save_data());
}

#[test]
fn test_auto_save_survives_game_boundaries() {
    let mut session = session(SessionConfig::new().with_seed(5).with_auto_save(None));
    session.enable_auto_save(Duration::from_secs(10));

    // No game: ticks do nothing.
    session.advance(Duration::from_secs(25));
    assert!(!session.saves().store().contains(SAVE_KEY).unwrap());

    // A game started later is still picked up by the same timer.
    session.start_game(2, 2).unwrap();
    session.advance(Duration::from_secs(5));
    assert!(session.saves().store().contains(SAVE_KEY).unwrap());
}
