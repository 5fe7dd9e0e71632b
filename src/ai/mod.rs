//! The AI side: static evaluation, minimax search with alpha-beta pruning,
//! and the background worker that runs searches off the control thread.

mod heuristic;
mod search;
mod selector;
mod worker;

pub use heuristic::{
    ConnectFourHeuristic, Heuristic, CENTER_WEIGHT, OPEN_THREE, OPEN_TWO, OPPONENT_THREE,
    OPPONENT_TWO,
};
pub use search::{SearchEngine, SearchReport, WIN_SCORE};
pub use selector::MoveSelector;
pub use worker::{log_worker_panics, SearchJob, SearchResult, SearchWorker, WORKER_THREAD_NAME};
