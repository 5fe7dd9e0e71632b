use crate::game::{Board, Cell, Player, CENTER_COL, ROWS};

/// Bonus per own piece in the center column.
pub const CENTER_WEIGHT: i32 = 3;
/// Window holding three own pieces and one empty cell.
pub const OPEN_THREE: i32 = 50;
/// Window holding two own pieces and two empty cells.
pub const OPEN_TWO: i32 = 10;
/// Opponent three; weighed below [`OPEN_THREE`] so the AI does not play
/// purely defensively.
pub const OPPONENT_THREE: i32 = -45;
pub const OPPONENT_TWO: i32 = -10;

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Default heuristic: center-column control plus a score for every
/// 4-cell window that only one player can still complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectFourHeuristic;

impl ConnectFourHeuristic {
    fn score_window(own: usize, opp: usize, empty: usize) -> i32 {
        match (own, opp, empty) {
            (3, 0, 1) => OPEN_THREE,
            (2, 0, 2) => OPEN_TWO,
            (0, 3, 1) => OPPONENT_THREE,
            (0, 2, 2) => OPPONENT_TWO,
            _ => 0,
        }
    }
}

impl Heuristic for ConnectFourHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        let own_cell = player.to_cell();
        let opp_cell = player.other().to_cell();
        let mut score = 0;

        // Center column bonus
        for row in 0..ROWS {
            let cell = board.get(row, CENTER_COL);
            if cell == own_cell {
                score += CENTER_WEIGHT;
            } else if cell == opp_cell {
                score -= CENTER_WEIGHT;
            }
        }

        for window in board.windows() {
            let mut own = 0;
            let mut opp = 0;
            let mut empty = 0;
            for cell in window {
                match cell {
                    Cell::Empty => empty += 1,
                    c if c == own_cell => own += 1,
                    _ => opp += 1,
                }
            }
            score += Self::score_window(own, opp, empty);
        }

        score
    }
}
