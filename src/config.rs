//! Application configuration.
//!
//! Read from an optional TOML file; every field has a default so a partial
//! (or missing) file still yields a usable config. Command-line flags are
//! applied on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::game::GameConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub leaderboard: LeaderboardConfig,
    /// Where tracing output goes; the terminal belongs to the UI
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Base URL of the high-score service. Unset means offline play.
    pub server_url: Option<String>,
    /// Local score file used when playing offline
    pub scores_file: PathBuf,
    /// Snapshot of the last displayed leaderboard
    pub snapshot_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            log_file: PathBuf::from("grid_snake.log"),
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            scores_file: PathBuf::from("scores.json"),
            snapshot_path: Some(PathBuf::from("high_scores.json")),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file gives the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        config.game = config.game.clamped();
        Ok(config)
    }
}
