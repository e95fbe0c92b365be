//! Fences and the edges they block.
//!
//! A fence is two cells long and sits on the grid lines around the 2x2 block
//! of cells whose north-west cell is the fence's anchor:
//!
//! - a horizontal fence at `(c, r)` lies between rows `r` and `r + 1`,
//!   covering columns `c` and `c + 1`;
//! - a vertical fence at `(c, r)` lies between columns `c` and `c + 1`,
//!   covering rows `r` and `r + 1`.
//!
//! Fences block edges, never cells. `FenceSet::blocks_edge` is the only place
//! that decides whether a single step crosses a fence.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::coord::{Coord, Direction};

/// Whether a fence runs east-west or north-south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Directions along which a fence of this orientation extends; a
    /// same-orientation fence anchored one slot away in either would overlap it.
    pub const fn extension(self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::West, Direction::East],
            Orientation::Vertical => [Direction::North, Direction::South],
        }
    }
}

/// A fence anchored at its north-west corner cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fence {
    pub anchor: Coord,
    pub orientation: Orientation,
}

impl Fence {
    pub const fn new(anchor: Coord, orientation: Orientation) -> Self {
        Fence { anchor, orientation }
    }

    pub const fn horizontal(col: i32, row: i32) -> Self {
        Fence::new(Coord::new(col, row), Orientation::Horizontal)
    }

    pub const fn vertical(col: i32, row: i32) -> Self {
        Fence::new(Coord::new(col, row), Orientation::Vertical)
    }
}

impl fmt::Display for Fence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = match self.orientation {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        };
        write!(f, "{}{}", self.anchor, o)
    }
}

/// The four anchors one slot away from a given anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborSlots {
    pub north: Coord,
    pub east: Coord,
    pub south: Coord,
    pub west: Coord,
}

impl NeighborSlots {
    pub const fn get(&self, dir: Direction) -> Coord {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }
}

/// Returns the adjacent anchors in each cardinal direction.
pub const fn neighbor_slots(anchor: Coord) -> NeighborSlots {
    NeighborSlots {
        north: anchor.step(Direction::North),
        east: anchor.step(Direction::East),
        south: anchor.step(Direction::South),
        west: anchor.step(Direction::West),
    }
}

/// The two fences either of which blocks a step from `from` towards `dir`.
pub fn edge_blockers(from: Coord, dir: Direction) -> [Fence; 2] {
    let slots = neighbor_slots(from);
    let base = match dir {
        Direction::North => slots.north,
        Direction::West => slots.west,
        Direction::East | Direction::South => from,
    };
    let (orientation, other) = match dir {
        Direction::North | Direction::South => (Orientation::Horizontal, base.step(Direction::West)),
        Direction::East | Direction::West => (Orientation::Vertical, base.step(Direction::North)),
    };
    [Fence::new(base, orientation), Fence::new(other, orientation)]
}

/// The placed fences of a game.
///
/// Ordered so that iteration and serialized snapshots are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FenceSet {
    fences: BTreeSet<Fence>,
}

impl FenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }

    pub fn contains(&self, fence: &Fence) -> bool {
        self.fences.contains(fence)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fence> {
        self.fences.iter()
    }

    /// Inserts a fence without any legality check. Returns false if already present.
    pub(crate) fn insert(&mut self, fence: Fence) -> bool {
        self.fences.insert(fence)
    }

    /// Returns a copy of this set with `candidate` added, leaving `self` untouched.
    pub fn with(&self, candidate: Fence) -> FenceSet {
        let mut working = self.clone();
        working.insert(candidate);
        working
    }

    /// Returns true if `candidate` cannot coexist with the placed fences.
    ///
    /// A candidate overlaps when any fence already sits on its anchor (either
    /// orientation, which covers stacking and crossing), or when a fence of the
    /// same orientation sits one slot away along the candidate's length.
    pub fn overlaps(&self, candidate: &Fence) -> bool {
        let anchor = candidate.anchor;
        if self.contains(&Fence::new(anchor, Orientation::Horizontal))
            || self.contains(&Fence::new(anchor, Orientation::Vertical))
        {
            return true;
        }
        let slots = neighbor_slots(anchor);
        candidate
            .orientation
            .extension()
            .iter()
            .any(|dir| self.contains(&Fence::new(slots.get(*dir), candidate.orientation)))
    }

    /// Returns true if a single step from `from` to `to` is blocked.
    ///
    /// Cells that are not orthogonally adjacent are always reported as
    /// blocked: no single step connects them.
    pub fn blocks_edge(&self, from: Coord, to: Coord) -> bool {
        match Direction::between(from, to) {
            Some(dir) => self.blocks_step(from, dir),
            None => true,
        }
    }

    /// Returns true if a step from `from` towards `dir` crosses a fence.
    pub fn blocks_step(&self, from: Coord, dir: Direction) -> bool {
        edge_blockers(from, dir).iter().any(|f| self.contains(f))
    }
}

impl FromIterator<Fence> for FenceSet {
    fn from_iter<I: IntoIterator<Item = Fence>>(iter: I) -> Self {
        FenceSet {
            fences: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FenceSet {
    type Item = &'a Fence;
    type IntoIter = std::collections::btree_set::Iter<'a, Fence>;

    fn into_iter(self) -> Self::IntoIter {
        self.fences.iter()
    }
}
