//! Board vocabulary shared by client and server.
//!
//! A snapshot travels as three rows joined by `|`, each row three cells joined
//! by `,`. Empty cells are `-`.

use std::fmt;

use crate::errors::{ProtocolError, Result};

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;

const EMPTY_CELL: char = '-';
const ROW_SEPARATOR: char = '|';
const CELL_SEPARATOR: char = ',';

/// One of the two symbols a seat places on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Crosses, always moves first
    X,
    /// Noughts
    O,
}

impl Mark {
    /// Both marks, first mover first.
    pub const BOTH: [Mark; 2] = [Mark::X, Mark::O];

    /// Single-character wire form.
    pub const fn as_char(self) -> char {
        match self {
            Self::X => 'X',
            Self::O => 'O',
        }
    }

    /// The other mark.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// Parse a mark field.
    pub fn decode(field: &str) -> Result<Self> {
        match field {
            "X" => Ok(Self::X),
            "O" => Ok(Self::O),
            other => Err(ProtocolError::InvalidMark(other.to_string())),
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// No mark yet
    #[default]
    Empty,
    /// Claimed by a mark
    Marked(Mark),
}

impl Cell {
    /// Single-character wire form.
    pub const fn as_char(self) -> char {
        match self {
            Self::Empty => EMPTY_CELL,
            Self::Marked(mark) => mark.as_char(),
        }
    }

    fn decode(field: &str) -> Result<Self> {
        match field {
            "-" => Ok(Self::Empty),
            "X" => Ok(Self::Marked(Mark::X)),
            "O" => Ok(Self::Marked(Mark::O)),
            other => Err(ProtocolError::InvalidCell(other.to_string())),
        }
    }
}

/// Full board snapshot as carried by `ESTADO`.
///
/// Indexed `cells[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardState {
    /// Cell grid, row-major
    pub cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl BoardState {
    /// All-empty board.
    pub const EMPTY: Self = Self { cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE] };

    /// Build a snapshot from explicit rows.
    pub const fn from_rows(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Cell at `(row, col)`. `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Encode as `a,b,c|d,e,f|g,h,i`.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(BOARD_SIZE * BOARD_SIZE * 2);
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                out.push(ROW_SEPARATOR);
            }
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    out.push(CELL_SEPARATOR);
                }
                out.push(cell.as_char());
            }
        }
        out
    }

    /// Decode from the three row fields of an `ESTADO` line.
    pub fn decode_rows(rows: &[&str]) -> Result<Self> {
        if rows.len() != BOARD_SIZE {
            return Err(ProtocolError::InvalidBoard {
                what: "rows",
                expected: BOARD_SIZE,
                actual: rows.len(),
            });
        }

        let mut state = Self::EMPTY;
        for (r, row) in rows.iter().enumerate() {
            let fields: Vec<&str> = row.split(CELL_SEPARATOR).collect();
            if fields.len() != BOARD_SIZE {
                return Err(ProtocolError::InvalidBoard {
                    what: "cells",
                    expected: BOARD_SIZE,
                    actual: fields.len(),
                });
            }
            for (c, field) in fields.iter().enumerate() {
                state.cells[r][c] = Cell::decode(field)?;
            }
        }

        Ok(state)
    }

    /// Decode a complete `a,b,c|d,e,f|g,h,i` string.
    pub fn decode(s: &str) -> Result<Self> {
        let rows: Vec<&str> = s.split(ROW_SEPARATOR).collect();
        Self::decode_rows(&rows)
    }
}
