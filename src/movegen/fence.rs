//! Fence placement generation.
//!
//! A candidate slot is legal when it lies on the board, does not overlap a
//! placed fence, and leaves every pawn a path to its goal line.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::board::{Board, Coord, Fence, FenceSet, Orientation, Pawn};
use crate::search::reachable;

/// Every fence slot on the board: `2 * (size - 1)^2` candidates.
pub fn fence_slots(board: &Board) -> Vec<Fence> {
    let anchors = board.size() - 1;
    let mut slots = Vec::with_capacity(2 * anchors * anchors);
    for row in 0..board.last() {
        for col in 0..board.last() {
            let anchor = Coord::new(col, row);
            slots.push(Fence::new(anchor, Orientation::Horizontal));
            slots.push(Fence::new(anchor, Orientation::Vertical));
        }
    }
    slots
}

/// Returns the index of the first pawn left without a path to its goal line
/// once `candidate` joins `fences`, or `None` if every pawn keeps one.
pub fn first_trapped_pawn(
    board: &Board,
    fences: &FenceSet,
    pawns: &[Pawn],
    candidate: Fence,
) -> Option<usize> {
    let working = fences.with(candidate);
    pawns.iter().position(|p| {
        let goal = board.goal_line(p.goal);
        !reachable(board, &working, p.position, &goal)
    })
}

/// Returns true if `candidate` may be placed: in range, no overlap, and no
/// pawn loses its path to its goal line.
pub fn is_legal_placement(board: &Board, fences: &FenceSet, pawns: &[Pawn], candidate: Fence) -> bool {
    board.contains_anchor(candidate.anchor)
        && !fences.overlaps(&candidate)
        && first_trapped_pawn(board, fences, pawns, candidate).is_none()
}

/// Enumerates all legal fence placements for the current fence set.
///
/// Each slot needs its own path searches, so slots are checked in parallel.
pub fn legal_fence_placements(board: &Board, fences: &FenceSet, pawns: &[Pawn]) -> BTreeSet<Fence> {
    fence_slots(board)
        .into_par_iter()
        .filter(|f| is_legal_placement(board, fences, pawns, *f))
        .collect()
}
