//! Pawns and their goals.

use serde::{Deserialize, Serialize};

use super::coord::{Coord, Direction};

/// A pawn on the board.
///
/// `goal` names the board edge the pawn races towards; `fences_left` is the
/// number of fences its seat may still place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pawn {
    pub position: Coord,
    pub goal: Direction,
    pub fences_left: u32,
}

impl Pawn {
    pub const fn new(position: Coord, goal: Direction, fences_left: u32) -> Self {
        Pawn {
            position,
            goal,
            fences_left,
        }
    }
}

/// Returns true if any pawn other than `except` stands on `cell`.
pub fn occupied_by_other(pawns: &[Pawn], cell: Coord, except: usize) -> bool {
    pawns
        .iter()
        .enumerate()
        .any(|(i, p)| i != except && p.position == cell)
}
