//! Error types.
//!
//! Every failure the engine can report is returned as a value; nothing in
//! the library panics on player input. Rejected clicks are not errors at all,
//! they simply come back as "not accepted".

use thiserror::Error;

/// Why a game could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("grid {rows}x{cols} is outside the supported 2..=6 range")]
    InvalidDimensions { rows: u8, cols: u8 },

    #[error("not enough symbols: need {needed} distinct symbols but only {available} are available")]
    NotEnoughSymbols { needed: usize, available: usize },

    #[error("a game is already running")]
    GameInProgress,
}

/// Failure of the durable key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a save did not reach the store.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no game has been dealt yet")]
    NothingToSave,

    #[error("failed to encode save data: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a load did not restore a game.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no save data found")]
    NoSaveData,

    #[error("save data is corrupt: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Corrupt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_error_messages() {
        let err = StartError::NotEnoughSymbols { needed: 9, available: 4 };
        assert_eq!(
            err.to_string(),
            "not enough symbols: need 9 distinct symbols but only 4 are available"
        );

        let err = StartError::InvalidDimensions { rows: 7, cols: 2 };
        assert!(err.to_string().contains("7x2"));
    }

    #[test]
    fn test_json_error_is_corrupt() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = LoadError::from(parse);
        assert!(matches!(err, LoadError::Corrupt(_)));
    }

    #[test]
    fn test_store_error_keeps_key() {
        let err = StoreError::Io {
            key: "slot".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("`slot`"));

        let save: SaveError = err.into();
        assert!(matches!(save, SaveError::Store(_)));
    }
}
