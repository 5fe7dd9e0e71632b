use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ConfigError;

/// Deepest search that can matter: one ply per cell.
pub const MAX_SEARCH_DEPTH: u32 = 42;

/// Longest accepted pause before an AI move is delivered.
pub const MAX_AI_MOVE_DELAY_MS: u64 = 10_000;

/// Parameters for a single search invocation.
///
/// Passed by value into every dispatched search, so later changes only
/// affect the next search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched, counting the AI's own move.
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { depth: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Minimum time between dispatching a search and delivering its move.
    /// The wait happens on the worker.
    pub ai_move_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            ai_move_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log destination. The TUI needs the terminal, so logs go to a file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: Some(PathBuf::from("connect-four.log")),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub game: GameConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
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
        validate_depth(self.search.depth)
            .map_err(|msg| ConfigError::Validation(format!("search.depth {msg}")))?;
        if self.game.ai_move_delay_ms > MAX_AI_MOVE_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "game.ai_move_delay_ms must be <= {MAX_AI_MOVE_DELAY_MS}"
            )));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

/// Check a search depth against `1..=MAX_SEARCH_DEPTH`.
pub(crate) fn validate_depth(depth: u32) -> Result<(), String> {
    if depth == 0 {
        Err("must be >= 1".to_string())
    } else if depth > MAX_SEARCH_DEPTH {
        Err(format!("must be <= {MAX_SEARCH_DEPTH}"))
    } else {
        Ok(())
    }
}
