use crate::config::SearchConfig;
use crate::game::{Board, Player};

use super::search::SearchEngine;

/// Chooses the AI's column. Runs on the search worker, so it must be `Send`.
pub trait MoveSelector: Send {
    /// Pick a column for `ai` on `board`, or `None` if no move is possible.
    fn select_move(&self, board: &Board, ai: Player, config: SearchConfig) -> Option<usize>;

    /// Return the selector's display name.
    fn name(&self) -> &str;
}

impl MoveSelector for SearchEngine {
    fn select_move(&self, board: &Board, ai: Player, config: SearchConfig) -> Option<usize> {
        self.find_best_move(board, ai, config)
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_engine_selects_legal_action() {
        let selector: Box<dyn MoveSelector> = Box::new(SearchEngine::new());
        let mut board = Board::new();
        for _ in 0..6 {
            board.apply_move(3, Player::One).unwrap();
        }
        let col = selector
            .select_move(&board, Player::Two, SearchConfig { depth: 3 })
            .unwrap();
        assert!(board.legal_moves().contains(&col), "column {col} is not legal");
    }

    #[test]
    fn name_is_minimax() {
        assert_eq!(SearchEngine::new().name(), "Minimax");
    }
}
