//! Quoridor rules engine.
//!
//! Exposes the board geometry, fence and pawn legality, path search, and the
//! turn state machine, plus an in-memory registry for hosting many games and
//! JSON snapshots for handing them to collaborators.

pub mod board;
pub mod engine;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod search;

pub use board::{Board, Coord, Direction, Fence, FenceSet, Orientation, Pawn};
pub use engine::{Engine, EngineError};
pub use game::{Configuration, Game, GameError, GameId, Status};
