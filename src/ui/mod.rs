//! Terminal UI: a single game screen driving the turn controller from
//! keyboard input.

mod app;
mod game_view;

pub use app::App;
