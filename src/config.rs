//! Game configuration, loadable from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::Board;
use crate::constants::{DEFAULT_SCOREBOARD_FILE, DEFAULT_SIZE};
use crate::error::ConfigError;
use crate::player::SeatKind;

/// Settings for a new game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Seat kinds in turn order: Black, Grey, White.
    pub players: [SeatKind; 3],
    /// Per-color clock in seconds. No clock when absent.
    pub time_limit_secs: Option<f64>,
    /// Seconds added to a color's clock after each of its turns.
    pub increment_secs: f64,
    pub seed: Option<u64>,
    pub scoreboard: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
            players: [SeatKind::Human, SeatKind::Heuristic, SeatKind::Random],
            time_limit_secs: None,
            increment_secs: 0.0,
            seed: None,
            scoreboard: PathBuf::from(DEFAULT_SCOREBOARD_FILE),
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Board::check_size(&[self.width as i64, self.height as i64])
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        if self.players.iter().all(|&p| p == SeatKind::None) {
            return Err(ConfigError::Validation(
                "players must seat at least one color".into(),
            ));
        }
        if let Some(limit) = self.time_limit_secs {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigError::Validation(
                    "time_limit_secs must be > 0".into(),
                ));
            }
        }
        if !self.increment_secs.is_finite() || self.increment_secs < 0.0 {
            return Err(ConfigError::Validation(
                "increment_secs must be >= 0".into(),
            ));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn increment(&self) -> Duration {
        Duration::try_from_secs_f64(self.increment_secs).unwrap_or(Duration::ZERO)
    }
}
