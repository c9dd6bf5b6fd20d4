//! Session layer: what the UI talks to.
//!
//! A [`Session`] owns one [`MatchEngine`](crate::rules::MatchEngine) and one
//! [`SaveManager`](crate::persist::SaveManager). There are no globals; a host
//! that wants two games makes two sessions.

pub mod collab;
pub mod game;

pub use collab::{AudioSink, EmojiAtlas, NullAudio, SymbolAtlas};
pub use game::{Session, EVENT_BACKLOG};
