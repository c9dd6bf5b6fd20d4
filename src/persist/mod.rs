//! Saving and restoring games.
//!
//! - [`SaveSnapshot`]: the persisted record and its validation.
//! - [`KeyValueStore`]: where records live ([`MemoryStore`], [`FileStore`]).
//! - [`SaveManager`]: save, load, existence check and delete under one
//!   fixed key.

pub mod manager;
pub mod snapshot;
pub mod store;

pub use manager::{SaveManager, SAVE_KEY};
pub use snapshot::{CardRecord, SaveSnapshot, SNAPSHOT_VERSION};
pub use store::{FileStore, KeyValueStore, MemoryStore};
