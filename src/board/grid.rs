//! Fixed-size square board.
//!
//! The side length is odd and at least 3 so that every edge has a single
//! midpoint cell to start a pawn on. It is capped so that every cell index
//! fits an `i32` coordinate and the cell count fits a `usize`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coord::{Coord, Direction};

/// Smallest playable board side.
pub const MIN_BOARD_SIZE: usize = 3;

/// Largest board side accepted.
pub const MAX_BOARD_SIZE: usize = 255;

/// Errors raised when constructing a board.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size must be odd and within {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}, got {0}")]
    InvalidSize(usize),
}

/// An immutable square grid of `size * size` cells.
///
/// Serializes as its bare size and re-validates on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Board {
    size: usize,
}

impl Board {
    /// Creates a board, rejecting even sizes and sizes outside the bounds.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) || size % 2 == 0 {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Board { size })
    }

    pub const fn size(self) -> usize {
        self.size
    }

    /// Index of the last row or column.
    pub const fn last(self) -> i32 {
        self.size as i32 - 1
    }

    /// Index of the middle row or column.
    pub const fn center(self) -> i32 {
        (self.size as i32 - 1) / 2
    }

    /// Returns true if the cell lies within `[0, size)` on both axes.
    pub const fn contains(self, c: Coord) -> bool {
        c.col >= 0 && c.row >= 0 && c.col <= self.last() && c.row <= self.last()
    }

    /// Returns true if `anchor` is a valid fence slot, i.e. within `[0, size - 1)`.
    pub const fn contains_anchor(self, anchor: Coord) -> bool {
        anchor.col >= 0 && anchor.row >= 0 && anchor.col < self.last() && anchor.row < self.last()
    }

    /// Dense index of an in-bounds cell, column-major.
    pub(crate) fn index(self, c: Coord) -> usize {
        c.col as usize * self.size + c.row as usize
    }

    pub const fn cell_count(self) -> usize {
        self.size * self.size
    }

    /// Returns true if the cell lies on the board edge named by `goal`.
    pub const fn on_edge(self, c: Coord, goal: Direction) -> bool {
        match goal {
            Direction::North => c.row == 0,
            Direction::East => c.col == self.last(),
            Direction::South => c.row == self.last(),
            Direction::West => c.col == 0,
        }
    }

    /// All cells on the board edge named by `goal`.
    pub fn goal_line(self, goal: Direction) -> Vec<Coord> {
        (0..self.size as i32)
            .map(|i| match goal {
                Direction::North => Coord::new(i, 0),
                Direction::East => Coord::new(self.last(), i),
                Direction::South => Coord::new(i, self.last()),
                Direction::West => Coord::new(0, i),
            })
            .collect()
    }

    /// The midpoint cell of the board edge named by `edge`.
    pub const fn edge_midpoint(self, edge: Direction) -> Coord {
        match edge {
            Direction::North => Coord::new(self.center(), 0),
            Direction::East => Coord::new(self.last(), self.center()),
            Direction::South => Coord::new(self.center(), self.last()),
            Direction::West => Coord::new(0, self.center()),
        }
    }
}

impl TryFrom<usize> for Board {
    type Error = BoardError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Board::new(size)
    }
}

impl From<Board> for usize {
    fn from(board: Board) -> usize {
        board.size
    }
}
