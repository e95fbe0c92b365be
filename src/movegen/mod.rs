//! Legal move generation.
//!
//! Generates the legal pawn destinations for the seat to move and the legal
//! fence placements for the current position.

pub mod fence;
pub mod pawn;

pub use fence::{fence_slots, first_trapped_pawn, is_legal_placement, legal_fence_placements};
pub use pawn::legal_destinations;
