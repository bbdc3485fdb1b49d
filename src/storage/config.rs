//! Configuration handling for hbit
//!
//! Configuration is stored in `~/.config/hbit/config.toml` (platform
//! dependent, see [`Config::default_path`]) and can be pointed elsewhere
//! with `--config` or `HBIT_CONFIG`.
//!
//! ```toml
//! default_format = "text"
//! data_file = "/home/me/sync/habits.json"
//!
//! [display]
//! show_stars = true
//! star = "★"
//! max_stars = 50
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;

/// File name of the state file inside the data directory
pub const DATA_FILE_NAME: &str = "habits.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Could not determine a data directory; pass --data-file or set HBIT_DATA_FILE")]
    NoDataDir,
}

/// How habits are drawn in `hbit list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Draw a bar of stars next to each streak
    pub show_stars: bool,

    /// Glyph used for one streak day
    pub star: String,

    /// Longest star bar before it is cut off with `…`
    pub max_stars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_stars: true,
            star: "★".to_string(),
            max_stars: 50,
        }
    }
}

impl DisplayConfig {
    /// Renders the star bar for a streak, e.g. `★★★ (3)`
    pub fn streak_bar(&self, streak: u32) -> String {
        if !self.show_stars {
            return format!("({})", streak);
        }

        let shown = (streak as usize).min(self.max_stars);
        let mut bar = self.star.repeat(shown);
        if shown < streak as usize {
            bar.push('…');
        }
        if bar.is_empty() {
            format!("({})", streak)
        } else {
            format!("{} ({})", bar, streak)
        }
    }
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Output format when `--format` is not given
    pub default_format: Option<OutputFormat>,

    /// Where the tracker state is stored
    pub data_file: Option<PathBuf>,

    /// Display settings
    pub display: DisplayConfig,
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "hbit", "hbit")
    }

    /// Returns the default config file location
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Returns the default state file location
    pub fn default_data_file() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join(DATA_FILE_NAME))
    }

    /// Loads configuration from `path`, or the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) => Self::load_from(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Loads configuration from a specific file; a missing file gives defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.display.show_stars && self.display.star.is_empty() {
            return Err(ConfigError::Invalid(
                "display.star must not be empty when show_stars is on".to_string(),
            ));
        }
        if self.data_file.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("data_file must not be empty".to_string()));
        }
        Ok(())
    }

    /// Picks the state file: explicit override, then config, then data dir
    pub fn resolve_data_file(&self, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }
        Self::default_data_file().ok_or(ConfigError::NoDataDir)
    }
}
