//! Board representation.
//!
//! Contains the geometry primitives, the board itself, fences with their
//! edge-blocking rules, and pawns.

pub mod coord;
pub mod fence;
pub mod grid;
pub mod pawn;

pub use coord::{Coord, Direction, ALL_DIRECTIONS};
pub use fence::{edge_blockers, neighbor_slots, Fence, FenceSet, NeighborSlots, Orientation};
pub use grid::{Board, BoardError, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use pawn::{occupied_by_other, Pawn};
