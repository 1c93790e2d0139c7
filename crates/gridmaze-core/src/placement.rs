//! Room footprint shapes and their placement into the maze.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use gridmaze_rng::MazeRng;

use crate::coord::{Coord, CoordPair};
use crate::maze::Maze;
use crate::room::{DoorType, RoomType};

/// A placement was asked to connect its footprint to a cell that is not
/// adjacent to any footprint cell. Callers guarantee adjacency, so this is a
/// contract violation, not a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementError {
    pub shape: RoomShape,
    pub source: Coord,
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no {} footprint cell adjacent to source {}",
            self.shape, self.source
        )
    }
}

impl std::error::Error for PlacementError {}

/// The closed set of room footprints.
///
/// Footprint geometry is data: a list of cell offsets with the anchor at
/// (0, 0). Only the boss room is excluded from ordinary growth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomShape {
    Regular,
    Long2H,
    Long2V,
    Square2,
    Boss3,
}

impl RoomShape {
    /// Cell offsets the shape occupies, anchor first
    pub fn footprint(self) -> &'static [(i32, i32)] {
        match self {
            RoomShape::Regular => &[(0, 0)],
            RoomShape::Long2H => &[(0, 0), (1, 0)],
            RoomShape::Long2V => &[(0, 0), (0, 1)],
            RoomShape::Square2 => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            RoomShape::Boss3 => &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ],
        }
    }

    /// Tag placed on the anchor cell
    pub fn room_type(self) -> RoomType {
        match self {
            RoomShape::Regular => RoomType::Regular,
            RoomShape::Long2H => RoomType::Long2H,
            RoomShape::Long2V => RoomType::Long2V,
            RoomShape::Square2 => RoomType::Square2,
            RoomShape::Boss3 => RoomType::Boss3,
        }
    }

    /// Growth-phase weight. The boss room never grows organically.
    pub fn weight(self) -> u32 {
        match self {
            RoomShape::Regular => 20,
            RoomShape::Long2H => 5,
            RoomShape::Long2V => 5,
            RoomShape::Square2 => 5,
            RoomShape::Boss3 => 0,
        }
    }

    /// Anchor positions whose translation covers `target` with every
    /// footprint cell free
    fn anchor_candidates(self, maze: &Maze, target: Coord) -> Vec<Coord> {
        self.footprint()
            .iter()
            .map(|&(dx, dy)| target.offset(-dx, -dy))
            .filter(|&anchor| self.fits_at(maze, anchor))
            .collect()
    }

    fn fits_at(self, maze: &Maze, anchor: Coord) -> bool {
        self.footprint()
            .iter()
            .all(|&(dx, dy)| !maze.is_occupied(anchor.offset(dx, dy)))
    }

    /// True if some translation of the footprint covers `target` with all
    /// footprint cells unoccupied
    pub fn can_place_covering(self, maze: &Maze, target: Coord) -> bool {
        !self.anchor_candidates(maze, target).is_empty()
    }

    /// Place the footprint so it covers `target` and door it to `source`.
    ///
    /// Picks uniformly at random among the legal translations. The anchor
    /// gets the shape's real tag; other footprint cells get continuation
    /// tags; orthogonal adjacencies inside the footprint become `Open`, and
    /// exactly one `Door` connects `source` to the footprint.
    pub fn place_covering(
        self,
        maze: &mut Maze,
        rng: &mut MazeRng,
        target: Coord,
        source: Coord,
    ) -> Result<(), PlacementError> {
        let candidates = self.anchor_candidates(maze, target);
        let anchor = *rng.choose(&candidates).ok_or(PlacementError {
            shape: self,
            source,
        })?;
        self.place_at(maze, anchor, source)
    }

    fn place_at(self, maze: &mut Maze, anchor: Coord, source: Coord) -> Result<(), PlacementError> {
        for &(dx, dy) in self.footprint() {
            let cell = anchor.offset(dx, dy);
            let tag = if (dx, dy) == (0, 0) {
                self.room_type()
            } else if dx > dy {
                RoomType::PartOfBigL
            } else {
                RoomType::PartOfBigD
            };
            maze.map.insert(cell, tag);
        }

        // Internal seams between footprint cells.
        for &(dx, dy) in self.footprint() {
            let cell = anchor.offset(dx, dy);
            for (sx, sy) in [(1, 0), (0, 1)] {
                if self.footprint().contains(&(dx + sx, dy + sy)) {
                    maze.doors
                        .insert(CoordPair::new(cell, cell.offset(sx, sy)), DoorType::Open);
                }
            }
        }

        // Exactly one door back to the rest of the maze.
        let entry = self
            .footprint()
            .iter()
            .map(|&(dx, dy)| anchor.offset(dx, dy))
            .find(|&cell| cell.is_adjacent(source))
            .ok_or(PlacementError {
                shape: self,
                source,
            })?;
        maze.doors
            .insert(CoordPair::new(entry, source), DoorType::Door);
        Ok(())
    }
}

/// Weighted pick among growth shapes able to cover `target`.
///
/// Draws a uniform integer in [0, weight sum) and walks the eligible shapes
/// in enumeration order, subtracting weights until the draw goes negative.
pub fn pick_growth_shape(maze: &Maze, rng: &mut MazeRng, target: Coord) -> Option<RoomShape> {
    let eligible: Vec<RoomShape> = RoomShape::iter()
        .filter(|s| s.weight() > 0 && s.can_place_covering(maze, target))
        .collect();
    if eligible.is_empty() {
        return None;
    }
    let total: u32 = eligible.iter().map(|s| s.weight()).sum();
    let mut roll = rng.rn2(total) as i64;
    for shape in eligible {
        roll -= shape.weight() as i64;
        if roll < 0 {
            return Some(shape);
        }
    }
    None
}
