//! Save manager: the one place that reads and writes the save record.

use log::{debug, info};

use super::snapshot::SaveSnapshot;
use super::store::KeyValueStore;
use crate::cards::Grid;
use crate::error::{LoadError, SaveError, StoreError};
use crate::rules::{MatchEngine, TurnState};

/// Key the save record lives under.
pub const SAVE_KEY: &str = "card_match.save";

/// Reads and writes the save record in a [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct SaveManager<S> {
    store: S,
}

impl<S: KeyValueStore> SaveManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Write the engine's current game, replacing any earlier record.
    pub fn save(&mut self, engine: &MatchEngine) -> Result<(), SaveError> {
        let snapshot = SaveSnapshot::capture(engine).ok_or(SaveError::NothingToSave)?;
        let json = serde_json::to_string(&snapshot)?;
        self.store.set(SAVE_KEY, &json)?;
        debug!(
            "saved {}x{} game, {} cards remaining",
            snapshot.rows, snapshot.cols, snapshot.cards_remaining
        );
        Ok(())
    }

    /// Read the saved game back as a grid and counters.
    ///
    /// Nothing is applied here; the caller hands the result to
    /// [`MatchEngine::resume`]. The record stays in the store.
    pub fn load(&self, symbol_count: usize) -> Result<(Grid, TurnState), LoadError> {
        let json = self.store.get(SAVE_KEY)?.ok_or(LoadError::NoSaveData)?;
        let snapshot: SaveSnapshot = serde_json::from_str(&json)?;
        snapshot.restore(symbol_count)
    }

    /// Is there a record to load?
    pub fn has_save_data(&self) -> Result<bool, StoreError> {
        self.store.contains(SAVE_KEY)
    }

    /// Remove the record. Succeeds when there is none.
    pub fn delete(&mut self) -> Result<(), StoreError> {
        self.store.remove(SAVE_KEY)?;
        info!("save data deleted");
        Ok(())
    }
}
