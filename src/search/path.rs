//! Breadth-first path search over the fenced grid.
//!
//! Cells are nodes; two orthogonally adjacent cells are connected unless the
//! fence set blocks the edge between them. Pawns are ignored: they never
//! block a path permanently.

use std::collections::VecDeque;

use crate::board::{Board, Coord, FenceSet, ALL_DIRECTIONS};

/// Returns the length of the shortest unblocked path from `source` to any
/// cell of `goal`, or `None` if every such path is cut by fences.
///
/// A source already on the goal has distance 0. Each cell is visited at most
/// once, so the search is bounded by the board's cell count.
pub fn distance_to_goal(
    board: &Board,
    fences: &FenceSet,
    source: Coord,
    goal: &[Coord],
) -> Option<usize> {
    if !board.contains(source) {
        return None;
    }

    let mut is_goal = vec![false; board.cell_count()];
    for &c in goal {
        if board.contains(c) {
            is_goal[board.index(c)] = true;
        }
    }

    let mut visited = vec![false; board.cell_count()];
    let mut queue = VecDeque::with_capacity(board.cell_count());
    visited[board.index(source)] = true;
    queue.push_back((source, 0usize));

    while let Some((cur, d)) = queue.pop_front() {
        if is_goal[board.index(cur)] {
            return Some(d);
        }
        for dir in ALL_DIRECTIONS {
            let next = cur.step(dir);
            if !board.contains(next) || visited[board.index(next)] {
                continue;
            }
            if fences.blocks_edge(cur, next) {
                continue;
            }
            visited[board.index(next)] = true;
            queue.push_back((next, d + 1));
        }
    }

    None
}

/// Returns true if some unblocked path leads from `source` to any cell of `goal`.
pub fn reachable(board: &Board, fences: &FenceSet, source: Coord, goal: &[Coord]) -> bool {
    distance_to_goal(board, fences, source, goal).is_some()
}
