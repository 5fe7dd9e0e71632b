use std::time::Instant;

use tracing::debug;

use crate::config::SearchConfig;
use crate::game::{Board, Player};

use super::heuristic::{ConnectFourHeuristic, Heuristic};

/// Score of a won position before the depth bonus. Dominates any heuristic
/// value by more than two orders of magnitude.
pub const WIN_SCORE: i32 = 1_000_000;

/// Result of a root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub column: usize,
    pub score: i32,
    /// Number of `minimax` calls made.
    pub nodes: u64,
}

/// Depth-limited minimax with alpha-beta pruning. The AI is the maximizer.
///
/// Moves are tried in ascending column order and only a strictly better
/// score replaces the incumbent, so ties go to the lowest column and results
/// are reproducible.
pub struct SearchEngine {
    heuristic: Box<dyn Heuristic>,
}

impl SearchEngine {
    pub fn new() -> Self {
        SearchEngine {
            heuristic: Box::new(ConnectFourHeuristic),
        }
    }

    pub fn with_heuristic(heuristic: Box<dyn Heuristic>) -> Self {
        SearchEngine { heuristic }
    }

    /// Static evaluation from `ai`'s point of view.
    pub fn evaluate(&self, board: &Board, ai: Player) -> i32 {
        self.heuristic.evaluate(board, ai)
    }

    /// Best column for `ai`, or `None` if the board has no legal move.
    pub fn find_best_move(&self, board: &Board, ai: Player, config: SearchConfig) -> Option<usize> {
        self.analyze(board, ai, config).map(|report| report.column)
    }

    /// Like [`SearchEngine::find_best_move`], also returning the score and
    /// node count.
    pub fn analyze(&self, board: &Board, ai: Player, config: SearchConfig) -> Option<SearchReport> {
        let started = Instant::now();
        let depth = config.depth.max(1);
        let mut nodes = 0;
        let mut best: Option<(usize, i32)> = None;

        for col in board.legal_moves() {
            let next = play(board, col, ai);
            let score = self.minimax(
                &next,
                depth - 1,
                i32::MIN,
                i32::MAX,
                ai.other(),
                ai,
                &mut nodes,
            );
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((col, score)),
            }
        }

        let (column, score) = best?;
        debug!(
            column,
            score,
            nodes,
            depth,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );
        Some(SearchReport {
            column,
            score,
            nodes,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        mover: Player,
        ai: Player,
        nodes: &mut u64,
    ) -> i32 {
        *nodes += 1;

        // Order matters: a move that fills the board can also win it.
        if board.has_connect_four(ai) {
            return WIN_SCORE + depth as i32;
        }
        if board.has_connect_four(ai.other()) {
            return -WIN_SCORE - depth as i32;
        }
        if depth == 0 {
            return self.evaluate(board, ai);
        }
        if board.is_draw() {
            return 0;
        }

        if mover == ai {
            let mut max_eval = i32::MIN;
            for col in board.legal_moves() {
                let next = play(board, col, mover);
                let eval = self.minimax(&next, depth - 1, alpha, beta, mover.other(), ai, nodes);
                max_eval = max_eval.max(eval);
                alpha = alpha.max(max_eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = i32::MAX;
            for col in board.legal_moves() {
                let next = play(board, col, mover);
                let eval = self.minimax(&next, depth - 1, alpha, beta, mover.other(), ai, nodes);
                min_eval = min_eval.min(eval);
                beta = beta.min(min_eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy of `board` with `player`'s piece dropped in the legal column `col`.
fn play(board: &Board, col: usize, player: Player) -> Board {
    let mut next = *board;
    if let Err(e) = next.apply_move(col, player) {
        unreachable!("legal column {col} rejected: {e}");
    }
    next
}
