//! Room and door tag vocabulary.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Tag on an occupied cell.
///
/// Multi-cell footprints tag one anchor cell with the real type; every other
/// footprint cell carries a `PartOfBig*` continuation tag that points back
/// toward the anchor by a fixed offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomType {
    /// The single entry room at the origin.
    Start,
    /// Ordinary 1x1 room.
    Regular,
    /// Cosmetic re-tag of a degree-1 `Regular` room; no topology effect.
    DeadEnd,
    /// Anchor of a 2x2 room.
    Square2,
    /// Anchor of a 2x1 room.
    Long2H,
    /// Anchor of a 1x2 room.
    Long2V,
    /// Anchor of the 3x3 boss room; at most one per maze.
    Boss3,
    /// Non-anchor footprint cell; resolves through the cell one step down (-y).
    PartOfBigD,
    /// Non-anchor footprint cell; resolves through the cell one step left (-x).
    PartOfBigL,
}

impl RoomType {
    /// Offset toward the anchor for continuation tags, `None` for real types
    pub fn anchor_step(self) -> Option<(i32, i32)> {
        match self {
            RoomType::PartOfBigD => Some((0, -1)),
            RoomType::PartOfBigL => Some((-1, 0)),
            _ => None,
        }
    }
}

/// Tag on an adjacent occupied cell pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum DoorType {
    /// Real door, traversable.
    Door,
    /// Internal seam between two cells of the same footprint, traversable.
    Open,
    /// Decorative wall that looks like a door but is not traversable.
    Fake,
}

impl DoorType {
    /// Whether the edge counts toward connectivity, degree and distance
    pub fn is_traversable(self) -> bool {
        matches!(self, DoorType::Door | DoorType::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_only_continuation_tags_resolve() {
        for ty in RoomType::iter() {
            let expected = matches!(ty, RoomType::PartOfBigD | RoomType::PartOfBigL);
            assert_eq!(ty.anchor_step().is_some(), expected, "{ty}");
        }
    }

    #[test]
    fn test_traversable_doors() {
        assert!(DoorType::Door.is_traversable());
        assert!(DoorType::Open.is_traversable());
        assert!(!DoorType::Fake.is_traversable());
    }
}
