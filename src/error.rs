use std::path::PathBuf;

use crate::game::COLS;

/// Errors from placing a piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range (expected 0..{cols})", cols = COLS)]
    ColumnOutOfRange(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Errors from commands issued to the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("It's not your turn or the game is over.")]
    InvalidTurn,

    #[error("Invalid move: {0}")]
    Move(#[from] MoveError),

    #[error("search depth {0} is out of range (expected 1..={max})", max = crate::config::MAX_SEARCH_DEPTH)]
    InvalidDepth(u32),

    #[error("the game controller has shut down")]
    ShutDown,
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
