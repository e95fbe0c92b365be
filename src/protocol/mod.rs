//! Game state encoding.
//!
//! Collaborators that persist or transmit games use these snapshots; the
//! engine itself never reads them back except through `decode_game`.

pub mod snapshot;

pub use snapshot::{check_game, decode_game, encode_game, SnapshotError};
