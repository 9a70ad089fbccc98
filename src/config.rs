//! Game configuration loaded from TOML.

use crate::games::cat_facts::Difficulty;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "cat_facts.toml";

/// Configuration for the quiz and its collaborators.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Difficulty of new games.
    #[serde(default)]
    difficulty: Difficulty,

    /// Endpoint serving `{ data: [{ fact, length }] }` pages.
    #[serde(default = "default_facts_url")]
    facts_url: String,

    /// Facts requested per fetch.
    #[serde(default = "default_fact_limit")]
    fact_limit: u32,

    /// Seconds before a fetch is abandoned.
    #[serde(default = "default_fetch_timeout_secs")]
    fetch_timeout_secs: u64,

    /// Seconds a fetched batch stays fresh.
    #[serde(default = "default_revalidate_secs")]
    revalidate_secs: u64,

    /// File holding the high score.
    #[serde(default = "default_score_file")]
    score_file: PathBuf,
}

#[instrument]
fn default_facts_url() -> String {
    "https://catfact.ninja/facts".to_string()
}

#[instrument]
fn default_fact_limit() -> u32 {
    50
}

#[instrument]
fn default_fetch_timeout_secs() -> u64 {
    10
}

#[instrument]
fn default_revalidate_secs() -> u64 {
    3600
}

#[instrument]
fn default_score_file() -> PathBuf {
    PathBuf::from("cat_facts_score.json")
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(difficulty = %config.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_FILE`] if present, else defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a chosen file cannot be read or parsed.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Returns the full fetch URL including the page size.
    pub fn facts_request_url(&self) -> String {
        format!("{}?limit={}", self.facts_url, self.fact_limit)
    }

    /// Returns the fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Returns how long a fetched batch stays fresh.
    pub fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            facts_url: default_facts_url(),
            fact_limit: default_fact_limit(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            revalidate_secs: default_revalidate_secs(),
            score_file: default_score_file(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
