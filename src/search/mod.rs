//! Path search.
//!
//! Proves that pawns keep a route to their goal line under a given fence set.

pub mod path;

pub use path::{distance_to_goal, reachable};
