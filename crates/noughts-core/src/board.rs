//! The 3x3 grid.
//!
//! # Invariants
//!
//! - A cell goes from empty to a mark at most once between resets.
//! - Only [`Board::reset`] clears marks.

use noughts_proto::{BOARD_SIZE, BoardState, Cell, Mark};

use crate::error::PlaceError;

/// Every winning line as `(row, col)` triples: rows, columns, diagonals.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Tic-tac-toe board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `mark` at `(row, col)`.
    ///
    /// Coordinates arrive straight from the wire, so they are signed and
    /// range-checked here.
    ///
    /// # Errors
    ///
    /// - `PlaceError::OutOfRange` if either coordinate is outside `0..=2`
    /// - `PlaceError::Occupied` if the cell already holds a mark
    pub fn place(&mut self, row: i32, col: i32, mark: Mark) -> Result<(), PlaceError> {
        let (r, c) = Self::index(row, col).ok_or(PlaceError::OutOfRange { row, col })?;

        if self.cell(row, col) != Some(Cell::Empty) {
            return Err(PlaceError::Occupied { row, col });
        }

        self.cells[r][c] = Cell::Marked(mark);
        Ok(())
    }

    /// Whether `mark` fills any row, column or diagonal.
    pub fn check_win(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&(r, c)| self.cells[r][c] == Cell::Marked(mark)))
    }

    /// Whether every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| *cell != Cell::Empty)
    }

    /// Clear every cell.
    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
    }

    /// Cell at `(row, col)`. `None` if out of range.
    pub fn cell(&self, row: i32, col: i32) -> Option<Cell> {
        Self::index(row, col).map(|(r, c)| self.cells[r][c])
    }

    /// Wire snapshot of the grid.
    pub fn snapshot(&self) -> BoardState {
        BoardState::from_rows(self.cells)
    }

    fn index(row: i32, col: i32) -> Option<(usize, usize)> {
        let r = usize::try_from(row).ok().filter(|r| *r < BOARD_SIZE)?;
        let c = usize::try_from(col).ok().filter(|c| *c < BOARD_SIZE)?;
        Some((r, c))
    }
}

impl From<BoardState> for Board {
    fn from(state: BoardState) -> Self {
        Self { cells: state.cells }
    }
}
