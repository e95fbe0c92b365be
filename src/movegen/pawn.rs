//! Pawn move generation.
//!
//! For each cardinal direction the mover either steps onto a free cell,
//! jumps straight over an adjacent opponent, or, when the straight landing is
//! fenced off, off the board or occupied, side-steps diagonally around the
//! opponent.

use std::collections::BTreeSet;

use crate::board::{occupied_by_other, Board, Coord, Direction, FenceSet, Pawn, ALL_DIRECTIONS};

/// Returns every cell the pawn at index `mover` may legally move to.
///
/// Duplicates reached from different directions collapse. No returned cell is
/// occupied by another pawn.
pub fn legal_destinations(
    board: &Board,
    fences: &FenceSet,
    pawns: &[Pawn],
    mover: usize,
) -> BTreeSet<Coord> {
    let mut dests = BTreeSet::new();
    let from = match pawns.get(mover) {
        Some(p) => p.position,
        None => return dests,
    };

    for dir in ALL_DIRECTIONS {
        destinations_towards(board, fences, pawns, mover, from, dir, &mut dests);
    }

    dests.retain(|c| !occupied_by_other(pawns, *c, mover));
    dests
}

/// Collects the destinations contributed by a single direction.
fn destinations_towards(
    board: &Board,
    fences: &FenceSet,
    pawns: &[Pawn],
    mover: usize,
    from: Coord,
    dir: Direction,
    dests: &mut BTreeSet<Coord>,
) {
    let step = from.step(dir);
    if !board.contains(step) || fences.blocks_edge(from, step) {
        return;
    }
    if !occupied_by_other(pawns, step, mover) {
        dests.insert(step);
        return;
    }

    let jump = step.step(dir);
    if can_land(board, fences, pawns, mover, step, jump) {
        dests.insert(jump);
        return;
    }

    for side in dir.perpendiculars() {
        let diag = step.step(side);
        if can_land(board, fences, pawns, mover, step, diag) {
            dests.insert(diag);
        }
    }
}

/// Returns true if a pawn standing on `over` could step to `to`.
fn can_land(
    board: &Board,
    fences: &FenceSet,
    pawns: &[Pawn],
    mover: usize,
    over: Coord,
    to: Coord,
) -> bool {
    board.contains(to) && !fences.blocks_edge(over, to) && !occupied_by_other(pawns, to, mover)
}
