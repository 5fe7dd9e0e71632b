//! Core Connect Four game logic: board representation, player types, and
//! terminal-state classification.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, CENTER_COL, COLS, ROWS, WINDOW};
pub use player::Player;
pub use state::GameOutcome;

#[cfg(test)]
pub(crate) use state::DRAWN_GAME;
