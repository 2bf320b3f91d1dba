use std::path::PathBuf;

use crate::board::Point;

/// Errors raised by the board and game-state rules.
///
/// Every variant is recoverable: move providers treat a failed `play` as a
/// rejected candidate, and a failed load leaves the active game untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GoError {
    #[error("point {0:?} is not on the board")]
    OutOfBounds(Point),

    #[error("point {0:?} is already occupied")]
    CellOccupied(Point),

    #[error("move at {0:?} would be suicide")]
    SuicideMove(Point),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid board size: {0}")]
    InvalidSize(String),

    #[error("malformed grid: {0}")]
    Format(String),
}

impl GoError {
    /// True for the three rejections `play` can produce.
    pub fn is_illegal_move(&self) -> bool {
        matches!(
            self,
            GoError::OutOfBounds(_) | GoError::CellOccupied(_) | GoError::SuicideMove(_)
        )
    }
}

/// Errors that can occur while saving or loading a game snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad grid in snapshot: {0}")]
    Format(#[from] GoError),

    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
