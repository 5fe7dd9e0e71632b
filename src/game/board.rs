use std::fmt;

use crate::error::MoveError;

use super::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Column holding the most winning lines.
pub const CENTER_COL: usize = COLS / 2;

/// Length of a winning run, and of every scoring window.
pub const WINDOW: usize = 4;

/// Row/column steps for the four axes: horizontal, vertical, `\`, `/`.
pub(crate) const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Cell {
    /// The player owning this cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::PlayerOne => 'X',
            Cell::PlayerTwo => 'O',
        }
    }
}

/// A 6x7 Connect Four grid. Row 0 is the top, row 5 is the bottom.
///
/// The grid is a plain `Copy` array, so every clone is fully independent of
/// the board it came from. Cells are only ever written by [`Board::apply_move`],
/// which keeps every column packed from the bottom up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    last_move: Option<(usize, usize)>,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            last_move: None,
        }
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn cols(&self) -> usize {
        COLS
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// `(row, col)` of the most recently placed piece
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// The player who placed the most recent piece
    pub fn last_player(&self) -> Option<Player> {
        self.last_move
            .and_then(|(row, col)| self.cells[row][col].player())
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn apply_move(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::ColumnOutOfRange(col));
        }

        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull(col));
        }

        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(MoveError::ColumnFull(col))?;

        self.cells[row][col] = player.to_cell();
        self.last_move = Some((row, col));
        Ok(row)
    }

    /// Columns with room for another piece, in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// True when no move remains. A full board can also be won, so callers
    /// check [`Board::has_connect_four`] first.
    pub fn is_draw(&self) -> bool {
        self.is_full()
    }

    /// Check whether `player` made the last move and it completed four in a row.
    ///
    /// Each move adds exactly one piece, so any run of four must pass through
    /// the last-placed cell; only the four axes through it are scanned.
    pub fn has_connect_four(&self, player: Player) -> bool {
        if self.last_player() != Some(player) {
            return false;
        }
        let Some((row, col)) = self.last_move else {
            return false;
        };
        let cell = player.to_cell();

        AXES.iter().any(|&(dr, dc)| {
            let count = 1
                + self.run_length(row, col, dr, dc, cell)
                + self.run_length(row, col, -dr, -dc, cell);
            count >= WINDOW
        })
    }

    /// Count matching cells stepping away from `(row, col)`, excluding it.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while Self::in_bounds(r, c) && self.cells[r as usize][c as usize] == cell {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    fn in_bounds(row: isize, col: isize) -> bool {
        (0..ROWS as isize).contains(&row) && (0..COLS as isize).contains(&col)
    }

    /// Every run of four cells on the board, along all four axes.
    pub fn windows(&self) -> impl Iterator<Item = [Cell; WINDOW]> + '_ {
        AXES.iter().flat_map(move |&(dr, dc)| {
            (0..ROWS).flat_map(move |row| {
                (0..COLS).filter_map(move |col| {
                    let end_r = row as isize + dr * (WINDOW as isize - 1);
                    let end_c = col as isize + dc * (WINDOW as isize - 1);
                    if !Self::in_bounds(end_r, end_c) {
                        return None;
                    }
                    let mut window = [Cell::Empty; WINDOW];
                    for (i, slot) in window.iter_mut().enumerate() {
                        let r = (row as isize + dr * i as isize) as usize;
                        let c = (col as isize + dc * i as isize) as usize;
                        *slot = self.cells[r][c];
                    }
                    Some(window)
                })
            })
        })
    }

    /// Number of pieces on the board
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(|cell| cell.symbol().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        let footer: Vec<String> = (1..=COLS).map(|col| col.to_string()).collect();
        write!(f, "{}", footer.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Build a board by playing `moves` alternately, Player::One first.
    fn play(moves: &[usize]) -> Board {
        let mut board = Board::new();
        let mut player = Player::One;
        for &col in moves {
            board.apply_move(col, player).unwrap();
            player = player.other();
        }
        board
    }

    fn assert_gravity(board: &Board) {
        for col in 0..COLS {
            let mut seen_piece = false;
            for row in 0..ROWS {
                if board.get(row, col) != Cell::Empty {
                    seen_piece = true;
                } else {
                    assert!(!seen_piece, "gap below row {row} in column {col}:\n{board}");
                }
            }
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.last_move(), None);
        assert_eq!(board.legal_moves(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!((board.rows(), board.cols()), (6, 7));
    }

    #[test]
    fn test_apply_move() {
        let mut board = Board::new();

        let row = board.apply_move(3, Player::One).unwrap();
        assert_eq!(row, 5); // Should land at bottom
        assert_eq!(board.get(5, 3), Cell::PlayerOne);
        assert_eq!(board.last_move(), Some((5, 3)));

        let row = board.apply_move(3, Player::Two).unwrap();
        assert_eq!(row, 4); // Should land on top of first piece
        assert_eq!(board.get(4, 3), Cell::PlayerTwo);
        assert_eq!(board.last_move(), Some((4, 3)));
        assert_eq!(board.last_player(), Some(Player::Two));
    }

    #[test]
    fn test_column_full_leaves_board_unchanged() {
        let mut board = Board::new();
        for _ in 0..ROWS {
            board.apply_move(0, Player::One).unwrap();
        }
        board.apply_move(1, Player::Two).unwrap();
        let before = board;

        assert!(board.is_column_full(0));
        assert_eq!(board.apply_move(0, Player::Two), Err(MoveError::ColumnFull(0)));
        assert_eq!(board, before);
        assert_eq!(board.legal_moves(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_out_of_range_column() {
        let mut board = Board::new();
        assert_eq!(
            board.apply_move(7, Player::One),
            Err(MoveError::ColumnOutOfRange(7))
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.apply_move(col, Player::One).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.is_draw());
        assert!(board.legal_moves().is_empty());
    }

    #[test]
    fn test_horizontal_win_both_players() {
        for player in [Player::One, Player::Two] {
            let mut board = Board::new();
            for col in [0, 1, 3] {
                board.apply_move(col, player).unwrap();
            }
            assert!(!board.has_connect_four(player));
            // Completing the gap: the last move sits inside the run
            board.apply_move(2, player).unwrap();
            assert!(board.has_connect_four(player), "{player:?}:\n{board}");
            assert!(!board.has_connect_four(player.other()));
        }
    }

    #[test]
    fn test_vertical_win_both_players() {
        for player in [Player::One, Player::Two] {
            let mut board = Board::new();
            board.apply_move(3, player.other()).unwrap();
            for _ in 0..3 {
                board.apply_move(3, player).unwrap();
            }
            assert!(!board.has_connect_four(player));
            board.apply_move(3, player).unwrap();
            assert!(board.has_connect_four(player), "{player:?}:\n{board}");
            assert!(!board.has_connect_four(player.other()));
        }
    }

    #[test]
    fn test_diagonal_up_win_both_players() {
        // "/" from (5,0) to (2,3)
        for player in [Player::One, Player::Two] {
            let filler = player.other();
            let mut board = Board::new();
            board.apply_move(0, player).unwrap();

            board.apply_move(1, filler).unwrap();
            board.apply_move(1, player).unwrap();

            board.apply_move(2, filler).unwrap();
            board.apply_move(2, filler).unwrap();
            board.apply_move(2, player).unwrap();

            board.apply_move(3, filler).unwrap();
            board.apply_move(3, filler).unwrap();
            board.apply_move(3, filler).unwrap();
            assert!(!board.has_connect_four(player));
            board.apply_move(3, player).unwrap();

            assert!(board.has_connect_four(player), "{player:?}:\n{board}");
            assert!(!board.has_connect_four(filler));
        }
    }

    #[test]
    fn test_diagonal_down_win_both_players() {
        // "\" from (2,3) to (5,6), completed at the bottom end
        for player in [Player::One, Player::Two] {
            let filler = player.other();
            let mut board = Board::new();
            board.apply_move(5, filler).unwrap();
            board.apply_move(5, player).unwrap();

            board.apply_move(4, filler).unwrap();
            board.apply_move(4, filler).unwrap();
            board.apply_move(4, player).unwrap();

            board.apply_move(3, filler).unwrap();
            board.apply_move(3, filler).unwrap();
            board.apply_move(3, filler).unwrap();
            board.apply_move(3, player).unwrap();
            assert!(!board.has_connect_four(player));

            board.apply_move(6, player).unwrap();
            assert!(board.has_connect_four(player), "{player:?}:\n{board}");
            assert!(!board.has_connect_four(filler));
        }
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.apply_move(col, Player::One).unwrap();
        }
        assert!(!board.has_connect_four(Player::One));
    }

    #[test]
    fn test_win_requires_run_through_last_move() {
        let mut board = Board::new();
        for col in 0..4 {
            board.apply_move(col, Player::One).unwrap();
        }
        assert!(board.has_connect_four(Player::One));
        // A later unrelated move by the other player moves the anchor away
        board.apply_move(6, Player::Two).unwrap();
        assert!(!board.has_connect_four(Player::One));
        assert!(!board.has_connect_four(Player::Two));
    }

    #[test]
    fn test_broken_run_is_not_a_win() {
        // X X O X X on the bottom row, last move in the middle of the right pair
        let mut board = Board::new();
        board.apply_move(0, Player::One).unwrap();
        board.apply_move(1, Player::One).unwrap();
        board.apply_move(2, Player::Two).unwrap();
        board.apply_move(4, Player::One).unwrap();
        board.apply_move(3, Player::One).unwrap();
        assert!(!board.has_connect_four(Player::One));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = play(&[3, 3, 2]);
        let mut copy = original;
        copy.apply_move(4, Player::Two).unwrap();
        copy.apply_move(4, Player::One).unwrap();

        assert_eq!(original.get(5, 4), Cell::Empty);
        assert_eq!(original.last_move(), Some((5, 2)));
        assert_eq!(original.piece_count(), 3);
        assert_eq!(copy.piece_count(), 5);
    }

    #[test]
    fn test_window_count() {
        // 24 horizontal + 21 vertical + 12 + 12 diagonal
        assert_eq!(Board::new().windows().count(), 69);
    }

    #[test]
    fn test_random_games_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut board = Board::new();
            let mut player = Player::One;
            loop {
                let legal = board.legal_moves();
                let expected: Vec<usize> =
                    (0..COLS).filter(|&c| board.get(0, c) == Cell::Empty).collect();
                assert_eq!(legal, expected);
                assert_eq!(legal.is_empty(), board.is_full());
                if legal.is_empty() {
                    break;
                }

                let col = legal[rng.random_range(0..legal.len())];
                let pieces = board.piece_count();
                board.apply_move(col, player).unwrap();
                assert_eq!(board.piece_count(), pieces + 1);
                assert_gravity(&board);

                if board.has_connect_four(player) {
                    break;
                }
                player = player.other();
            }
        }
    }

    #[test]
    fn test_display() {
        let board = play(&[0, 6]);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS + 1);
        assert_eq!(lines[5], "X . . . . . O");
        assert_eq!(lines[6], "1 2 3 4 5 6 7");
    }
}
