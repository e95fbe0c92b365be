//! Grid coordinates and cardinal directions.
//!
//! Coordinates are zero-based `(column, row)` pairs with no implicit bounds;
//! columns grow eastward and rows grow southward. Bounds are the board's
//! concern, not the coordinate's.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell (or fence anchor) on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub col: i32,
    pub row: i32,
}

impl Coord {
    pub const fn new(col: i32, row: i32) -> Self {
        Coord { col, row }
    }

    /// Returns the coordinate translated by the given column and row deltas.
    pub const fn offset(self, d_col: i32, d_row: i32) -> Self {
        Coord {
            col: self.col + d_col,
            row: self.row + d_row,
        }
    }

    /// Returns the neighbouring coordinate one step in `dir`.
    pub const fn step(self, dir: Direction) -> Self {
        let (d_col, d_row) = dir.delta();
        self.offset(d_col, d_row)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// One of the four cardinal directions.
///
/// Also names a board edge: a pawn whose goal is `East` wins on the last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// All four directions in clockwise order starting from north.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// Returns the `(column, row)` delta of a single step.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Returns the two directions at right angles to this one.
    pub const fn perpendiculars(self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::West, Direction::East],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }

    /// Resolves the direction of a single orthogonal step from `from` to `to`.
    ///
    /// Returns `None` when the cells are not orthogonally adjacent, including
    /// diagonal neighbours and identical cells.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        match (to.col - from.col, to.row - from.row) {
            (0, -1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}
