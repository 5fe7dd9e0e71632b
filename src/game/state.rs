use super::{Board, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

impl GameOutcome {
    /// Classify the board after `mover` has just played.
    ///
    /// The win is checked before the draw: the last empty cell can complete a
    /// line, and that board is a win, not a draw.
    pub fn after_move(board: &Board, mover: Player) -> Option<GameOutcome> {
        if board.has_connect_four(mover) {
            Some(GameOutcome::Winner(mover))
        } else if board.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }
}

/// Columns of a complete game, Player::One first, that fills the board
/// without either player ever lining up four.
#[cfg(test)]
pub(crate) const DRAWN_GAME: [usize; 42] = [
    5, 4, 5, 0, 6, 2, 4, 5, 5, 0, 4, 1, 1, 0, 4, 5, 6, 5, 3, 1, 1,
    2, 2, 6, 2, 6, 6, 3, 6, 2, 0, 3, 0, 3, 3, 4, 3, 1, 4, 2, 1, 0,
];
