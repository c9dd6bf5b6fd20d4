//! Notifications the engine raises for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Sound cues, numbered the way the audio bank is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// A card starts turning over.
    Flip,
    /// The last pair was found.
    Win,
    /// A pair was found.
    Match,
    /// Two different cards were turned up.
    Mismatch,
}

impl AudioCue {
    /// Index in the audio bank.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            AudioCue::Flip => 0,
            AudioCue::Win => 1,
            AudioCue::Match => 2,
            AudioCue::Mismatch => 3,
        }
    }
}

/// Something visible or audible happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A fresh grid was dealt, face-up.
    Dealt { cards: usize },
    /// A card started turning over.
    FlipStarted { card: CardId, face_up: bool },
    /// A card's flip animation finished.
    FlipSettled { card: CardId },
    /// Two cards were found to match and leave play.
    Matched { first: CardId, second: CardId },
    /// Two cards did not match and are turning back.
    Mismatched { first: CardId, second: CardId },
    /// The game was won.
    Won { turns: u32 },
    /// The game was abandoned.
    GaveUp,
    /// A saved game replaced the current one.
    Restored { in_game: bool },
    /// Play a sound.
    Audio { cue: AudioCue, volume: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_cue_ids() {
        assert_eq!(AudioCue::Flip.id(), 0);
        assert_eq!(AudioCue::Win.id(), 1);
        assert_eq!(AudioCue::Match.id(), 2);
        assert_eq!(AudioCue::Mismatch.id(), 3);
    }
}
