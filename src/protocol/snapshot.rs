//! JSON snapshots of game state.
//!
//! A snapshot carries everything needed to rebuild a game exactly: the
//! identifier, board size, pawns with their positions, goals and fence
//! budgets, the fence list, the turn, and the over flag.
//!
//! Decoding re-checks the engine's invariants so that a hand-edited or
//! corrupted snapshot cannot smuggle an illegal position into the registry.

use thiserror::Error;

use crate::board::{Coord, Fence, FenceSet};
use crate::game::{Game, RawGame};
use crate::search::reachable;

/// Errors raised when encoding or decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("a game needs at least two pawns, got {0}")]
    TooFewPawns(usize),

    #[error("turn {turn} is outside seats 1..={seats}")]
    TurnOutOfRange { turn: usize, seats: usize },

    #[error("pawn at {0} is outside the board")]
    PawnOutOfBounds(Coord),

    #[error("two pawns share {0}")]
    StackedPawns(Coord),

    #[error("fence {0} is outside the board")]
    FenceOutOfBounds(Fence),

    #[error("fence {0} overlaps another one")]
    OverlappingFence(Fence),

    #[error("seat {0} has no path to its goal line")]
    NoPathToGoal(usize),

    #[error("over flag is {over} but {on_goal} pawns stand on their goal line")]
    InconsistentOver { over: bool, on_goal: usize },
}

/// Encodes a game as a single-line JSON document.
pub fn encode_game(game: &Game) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(game)?)
}

/// Decodes a game and checks that it is a position the engine could reach.
pub fn decode_game(s: &str) -> Result<Game, SnapshotError> {
    let raw: RawGame = serde_json::from_str(s)?;
    Game::try_from(raw)
}

/// Verifies the invariants the state machine maintains.
pub fn check_game(game: &Game) -> Result<(), SnapshotError> {
    let board = game.board();
    let pawns = game.pawns();

    if pawns.len() < 2 {
        return Err(SnapshotError::TooFewPawns(pawns.len()));
    }
    if game.turn() == 0 || game.turn() > pawns.len() {
        return Err(SnapshotError::TurnOutOfRange {
            turn: game.turn(),
            seats: pawns.len(),
        });
    }

    for (i, p) in pawns.iter().enumerate() {
        if !board.contains(p.position) {
            return Err(SnapshotError::PawnOutOfBounds(p.position));
        }
        if pawns[..i].iter().any(|q| q.position == p.position) {
            return Err(SnapshotError::StackedPawns(p.position));
        }
    }

    let mut placed = FenceSet::new();
    for fence in game.fences() {
        if !board.contains_anchor(fence.anchor) {
            return Err(SnapshotError::FenceOutOfBounds(*fence));
        }
        if placed.overlaps(fence) {
            return Err(SnapshotError::OverlappingFence(*fence));
        }
        placed.insert(*fence);
    }

    for (i, p) in pawns.iter().enumerate() {
        let goal = board.goal_line(p.goal);
        if !reachable(board, game.fences(), p.position, &goal) {
            return Err(SnapshotError::NoPathToGoal(i + 1));
        }
    }

    let on_goal = pawns
        .iter()
        .filter(|p| board.on_edge(p.position, p.goal))
        .count();
    if game.is_over() != (on_goal == 1) || on_goal > 1 {
        return Err(SnapshotError::InconsistentOver {
            over: game.is_over(),
            on_goal,
        });
    }

    Ok(())
}
