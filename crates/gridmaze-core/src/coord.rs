//! Grid coordinates and canonical cell-pair keys.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One cell on the unbounded integer grid.
///
/// Ordering is (x, then y). It carries no spatial meaning; it exists to
/// canonicalize pairs and to keep map iteration deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

/// Orthogonal neighbor offsets in fixed order: north, east, south, west.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by (dx, dy)
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four orthogonal neighbors, north, east, south, west
    pub fn neighbors(self) -> [Coord; 4] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// True if `other` is exactly one orthogonal step away
    pub fn is_adjacent(self, other: Coord) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unordered pair of two distinct grid cells, the key for door lookups.
///
/// Stored as (min, max) under `Coord` ordering, so construction from (a, b)
/// and (b, a) produces the identical key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CoordPair {
    low: Coord,
    high: Coord,
}

impl CoordPair {
    /// Canonicalize (a, b). The two cells must be distinct.
    pub fn new(a: Coord, b: Coord) -> Self {
        assert_ne!(a, b, "pair endpoints must be distinct");
        if a < b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The lesser endpoint under `Coord` ordering
    pub fn low(self) -> Coord {
        self.low
    }

    /// The greater endpoint under `Coord` ordering
    pub fn high(self) -> Coord {
        self.high
    }
}

impl fmt::Display for CoordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}
