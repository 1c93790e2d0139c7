//! The maze grid: occupied cells and door assignments.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::coord::{Coord, CoordPair};
use crate::room::{DoorType, RoomType};

/// Start cell of every maze.
pub const START: Coord = Coord::new(0, 0);

/// Room-and-corridor topology on the unbounded integer grid.
///
/// Two mappings make up the whole state: occupied cell to room tag, and
/// canonical adjacent-cell pair to door tag. These are also the entire output
/// contract; rendering and export layers only ever read them. Ordered maps
/// keep iteration deterministic, which the seeded generator relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    /// Occupied cells and their room tags.
    #[serde(with = "as_entries")]
    pub map: BTreeMap<Coord, RoomType>,
    /// Door tags between adjacent occupied cells.
    #[serde(with = "as_entries")]
    pub doors: BTreeMap<CoordPair, DoorType>,
}

impl Maze {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied cells. Multi-cell rooms count each cell.
    pub fn room_count(&self) -> usize {
        self.map.len()
    }

    pub fn is_occupied(&self, c: Coord) -> bool {
        self.map.contains_key(&c)
    }

    /// The cell's real room type, following continuation tags to the anchor.
    ///
    /// Returns `None` for unoccupied cells. Every step moves -x or -y, so the
    /// walk cannot cycle; the bound covers any well-formed footprint.
    pub fn resolved_type(&self, c: Coord) -> Option<RoomType> {
        let mut cur = c;
        let mut ty = *self.map.get(&cur)?;
        for _ in 0..8 {
            match ty.anchor_step() {
                Some((dx, dy)) => {
                    cur = cur.offset(dx, dy);
                    ty = *self.map.get(&cur)?;
                }
                None => return Some(ty),
            }
        }
        None
    }

    /// Count of traversable doors incident to `c`
    pub fn degree(&self, c: Coord) -> usize {
        c.neighbors()
            .iter()
            .filter(|&&n| {
                self.is_occupied(n)
                    && self
                        .doors
                        .get(&CoordPair::new(c, n))
                        .is_some_and(|d| d.is_traversable())
            })
            .count()
    }

    /// Hop count from `source` to every reachable occupied cell.
    ///
    /// Breadth-first over `Door`/`Open` edges only; unreachable cells are
    /// absent from the result.
    pub fn distances(&self, source: Coord) -> BTreeMap<Coord, u32> {
        let mut dist = BTreeMap::new();
        if !self.is_occupied(source) {
            return dist;
        }
        dist.insert(source, 0);
        let mut queue = VecDeque::from([source]);
        while let Some(cur) = queue.pop_front() {
            let d = dist[&cur];
            for n in cur.neighbors() {
                if !self.is_occupied(n) || dist.contains_key(&n) {
                    continue;
                }
                if self
                    .doors
                    .get(&CoordPair::new(cur, n))
                    .is_some_and(|t| t.is_traversable())
                {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    /// `distances` from every occupied cell as source.
    ///
    /// Recomputed from scratch on every call: the loop-injection phase
    /// mutates the graph between picks, and stale distances would bias the
    /// greedy choice.
    pub fn all_distances(&self) -> BTreeMap<Coord, BTreeMap<Coord, u32>> {
        self.map.keys().map(|&c| (c, self.distances(c))).collect()
    }
}

/// Struct-keyed maps do not survive JSON's string-keyed objects, so both
/// tables serialize as entry lists.
mod as_entries {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let entries = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
