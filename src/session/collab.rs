//! Collaborators a session talks to: the symbol source and the audio sink.

use crate::core::SymbolId;
use crate::rules::AudioCue;

/// Source of card faces.
///
/// The session only needs to know how many symbols exist (to size deals and
/// check saves) and how to look one up. What a "visual" is (a texture
/// handle, a glyph, a file name) is up to the implementation.
pub trait SymbolAtlas {
    type Visual: ?Sized;

    /// Number of distinct symbols; valid ids are `0..symbol_count()`.
    fn symbol_count(&self) -> usize;

    /// Face for `symbol`, `None` for an unknown or unassigned id.
    fn symbol_visual(&self, symbol: SymbolId) -> Option<&Self::Visual>;

    /// Card back.
    fn back_visual(&self) -> &Self::Visual;
}

/// Receiver for sound cues.
pub trait AudioSink {
    fn on_audio_cue(&mut self, cue: AudioCue, volume: f32);
}

/// Audio sink that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn on_audio_cue(&mut self, _cue: AudioCue, _volume: f32) {}
}

const EMOJI: &[&str] = &[
    // Animals
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮", "🐷", "🐸", "🐵",
    "🦄", "🐝", "🦋", "🐌", "🐞", "🐢", "🐍", "🐙", "🦑", "🦐", "🦞", "🦀", "🐡", "🐠", "🐬",
    // Fruits
    "🍏", "🍎", "🍐", "🍊", "🍋", "🍌", "🍉", "🍇", "🍓", "🫐", "🍈", "🍒", "🍑", "🥭", "🍍",
    "🥥", "🥝", "🍅", "🥑",
    // Food
    "🍔", "🍕", "🍟", "🌮", "🍦", "🎂", "🍿", "🍣", "🍱", "🍜", "🍝",
];

const EMOJI_BACK: &str = "🂠";

/// Built-in atlas of emoji faces.
#[derive(Clone, Debug)]
pub struct EmojiAtlas {
    symbols: Vec<&'static str>,
}

impl Default for EmojiAtlas {
    fn default() -> Self {
        Self {
            symbols: EMOJI.to_vec(),
        }
    }
}

impl EmojiAtlas {
    /// Atlas with every built-in emoji.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atlas with at most `count` emoji.
    #[must_use]
    pub fn with_limit(count: usize) -> Self {
        Self {
            symbols: EMOJI.iter().copied().take(count).collect(),
        }
    }
}

impl SymbolAtlas for EmojiAtlas {
    type Visual = str;

    fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    fn symbol_visual(&self, symbol: SymbolId) -> Option<&str> {
        symbol.as_index().and_then(|i| self.symbols.get(i)).copied()
    }

    fn back_visual(&self) -> &str {
        EMOJI_BACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_emoji_are_distinct() {
        let atlas = EmojiAtlas::new();
        let unique: FxHashSet<_> = EMOJI.iter().collect();

        assert_eq!(unique.len(), atlas.symbol_count());
        // Enough for the largest grid.
        assert!(atlas.symbol_count() >= 18);
    }

    #[test]
    fn test_emoji_lookup() {
        let atlas = EmojiAtlas::with_limit(3);

        assert_eq!(atlas.symbol_count(), 3);
        assert_eq!(atlas.symbol_visual(SymbolId::new(0)), Some("🐶"));
        assert_eq!(atlas.symbol_visual(SymbolId::new(3)), None);
        assert_eq!(atlas.symbol_visual(SymbolId::UNASSIGNED), None);
        assert_eq!(atlas.back_visual(), "🂠");
    }
}
