//! Crate error type.
//!
//! The simulation itself has no recoverable failures; these cover the
//! boundaries where outside data enters (names, config files, store files).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A difficulty name outside {medium, hard, god}
    #[error("unknown difficulty '{0}' (expected medium, hard or god)")]
    UnknownDifficulty(String),

    /// Difficulty can only change while the main menu is showing
    #[error("difficulty can only be changed from the main menu")]
    DifficultyLocked,

    /// A tuning value is outside its usable range
    #[error("invalid tuning value for '{field}': {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
