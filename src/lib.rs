//! # Minimax Connect Four
//!
//! Connect Four against an AI that searches the game tree with minimax and
//! alpha-beta pruning. Searches run on a background worker while the turn
//! controller keeps sole ownership of the live board. A terminal UI built
//! with Ratatui is included as the default frontend.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, player, outcomes
//! - [`ai`]: Heuristic evaluation, minimax search, background search worker
//! - [`controller`]: Turn state machine, observer callbacks, search dispatch
//! - [`ui`]: Terminal UI
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod ui;
