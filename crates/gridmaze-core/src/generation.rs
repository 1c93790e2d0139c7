//! Generation phases and the attempt driver.
//!
//! One attempt runs the phase sequence against a fresh grid: seed, grow,
//! boss room, grow more, loop injection, fake doors, dead-end marking. Any
//! phase failure discards the whole grid and the driver starts over; callers
//! only ever observe a fully valid maze.

use std::cmp::Reverse;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gridmaze_rng::MazeRng;

use crate::coord::{Coord, CoordPair};
use crate::maze::{Maze, START};
use crate::placement::{pick_growth_shape, PlacementError, RoomShape};
use crate::room::{DoorType, RoomType};

/// Tuning knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenConfig {
    /// Occupied-cell count to reach before the boss room is placed.
    pub first_growth_target: usize,
    /// Occupied-cell count the finished maze must reach.
    pub final_growth_target: usize,
    /// Doors added to close the longest available cycles.
    pub loops: usize,
    /// Decorative non-traversable doors.
    pub fake_doors: usize,
    /// Leaf rooms re-tagged as dead ends; fewer available fails the attempt.
    pub dead_ends: usize,
    /// Attempts before generation gives up.
    pub max_attempts: u32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            first_growth_target: 20,
            final_growth_target: 60,
            loops: 2,
            fake_doors: 2,
            dead_ends: 5,
            max_attempts: 1000,
        }
    }
}

/// Failure that aborts a single attempt. The grid state is discarded whole;
/// nothing is salvaged between attempts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("no empty cell admits the boss footprint")]
    ImpossibleBossPlacement,
    #[error("{found} dead-end candidates, {needed} required")]
    InsufficientDeadEnds { found: usize, needed: usize },
}

/// Failure of the whole generation run.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no valid maze after {0} attempts")]
    AttemptsExhausted(u32),
}

/// Generate a maze, restarting failed attempts from an empty grid until one
/// completes or the attempt cap is hit.
pub fn generate(config: &GenConfig, rng: &mut MazeRng) -> Result<Maze, GenerateError> {
    for attempt in 1..=config.max_attempts {
        match try_generate(config, rng) {
            Ok(maze) => {
                debug!(
                    "generated {} cells on attempt {attempt} (seed {})",
                    maze.room_count(),
                    rng.seed()
                );
                return Ok(maze);
            }
            Err(err) => debug!("attempt {attempt} failed: {err}"),
        }
    }
    Err(GenerateError::AttemptsExhausted(config.max_attempts))
}

/// Run the phase sequence once against a fresh grid.
pub fn try_generate(config: &GenConfig, rng: &mut MazeRng) -> Result<Maze, AttemptError> {
    let mut maze = Maze::new();
    maze.map.insert(START, RoomType::Start);

    grow_to(&mut maze, rng, config.first_growth_target)?;
    place_boss_room(&mut maze, rng)?;
    grow_to(&mut maze, rng, config.final_growth_target)?;
    inject_loops(&mut maze, config.loops);
    inject_fake_doors(&mut maze, rng, config.fake_doors);
    mark_dead_ends(&mut maze, config.dead_ends)?;

    Ok(maze)
}

/// Attach rooms to random occupied cells until the maze holds `target` cells.
///
/// Each round samples an occupied cell, then one of its four neighbors; a
/// boss-room source, an occupied neighbor, or a neighbor no shape can cover
/// just discards the sample and re-rolls. The loop is driven purely by the
/// cell-count postcondition.
fn grow_to(maze: &mut Maze, rng: &mut MazeRng, target: usize) -> Result<(), AttemptError> {
    while maze.room_count() < target {
        let cells: Vec<Coord> = maze.map.keys().copied().collect();
        let cell = cells[rng.rn2(cells.len() as u32) as usize];
        if maze.resolved_type(cell) == Some(RoomType::Boss3) {
            continue;
        }

        let next = cell.neighbors()[rng.rn2(4) as usize];
        if maze.is_occupied(next) {
            continue;
        }

        let Some(shape) = pick_growth_shape(maze, rng, next) else {
            continue;
        };
        shape.place_covering(maze, rng, next, cell)?;
    }
    Ok(())
}

/// Place the 3x3 boss room next to the farthest reachable cell from start.
fn place_boss_room(maze: &mut Maze, rng: &mut MazeRng) -> Result<(), AttemptError> {
    let dist = maze.distances(START);
    let mut sources: Vec<Coord> = dist.keys().copied().collect();
    sources.sort_by_key(|c| Reverse(dist[c]));

    for source in sources {
        for next in source.neighbors() {
            if maze.is_occupied(next) {
                continue;
            }
            if RoomShape::Boss3.can_place_covering(maze, next) {
                RoomShape::Boss3.place_covering(maze, rng, next, source)?;
                return Ok(());
            }
        }
    }
    Err(AttemptError::ImpossibleBossPlacement)
}

/// Adjacent occupied cell pairs with no door assigned, excluding pairs that
/// touch the boss room.
fn possible_doors(maze: &Maze) -> Vec<CoordPair> {
    let mut pairs = Vec::new();
    for &cell in maze.map.keys() {
        for (dx, dy) in [(1, 0), (0, 1)] {
            let other = cell.offset(dx, dy);
            if !maze.is_occupied(other) {
                continue;
            }
            let pair = CoordPair::new(cell, other);
            if maze.doors.contains_key(&pair) {
                continue;
            }
            if maze.resolved_type(cell) == Some(RoomType::Boss3)
                || maze.resolved_type(other) == Some(RoomType::Boss3)
            {
                continue;
            }
            pairs.push(pair);
        }
    }
    pairs
}

/// Add up to `count` doors, each closing the longest cycle available.
///
/// Greedy: every pick takes the candidate pair whose endpoints are currently
/// farthest apart. Distances are recomputed before each pick because the
/// previous door reshapes the whole graph.
fn inject_loops(maze: &mut Maze, count: usize) {
    let mut candidates = possible_doors(maze);
    for _ in 0..count {
        if candidates.is_empty() {
            break;
        }
        let all = maze.all_distances();
        let mut best = 0;
        let mut best_gap = 0;
        for (i, pair) in candidates.iter().enumerate() {
            let gap = all
                .get(&pair.low())
                .and_then(|d| d.get(&pair.high()))
                .copied()
                .unwrap_or(0);
            if gap > best_gap {
                best_gap = gap;
                best = i;
            }
        }
        let pair = candidates.remove(best);
        maze.doors.insert(pair, DoorType::Door);
    }
}

/// Dress up to `count` unused adjacencies as decorative doors.
fn inject_fake_doors(maze: &mut Maze, rng: &mut MazeRng, count: usize) {
    let mut candidates = possible_doors(maze);
    rng.shuffle(&mut candidates);
    for pair in candidates.into_iter().take(count) {
        maze.doors.insert(pair, DoorType::Fake);
    }
}

/// Re-tag the `count` farthest degree-1 regular rooms as dead ends.
// TODO: decide between farthest-first and shuffled candidate selection.
fn mark_dead_ends(maze: &mut Maze, count: usize) -> Result<(), AttemptError> {
    let dist = maze.distances(START);
    let mut leaves: Vec<Coord> = maze
        .map
        .keys()
        .copied()
        .filter(|&c| maze.resolved_type(c) == Some(RoomType::Regular) && maze.degree(c) == 1)
        .collect();
    leaves.sort_by_key(|c| Reverse(dist.get(c).copied().unwrap_or(0)));

    if leaves.len() < count {
        return Err(AttemptError::InsufficientDeadEnds {
            found: leaves.len(),
            needed: count,
        });
    }
    for cell in leaves.into_iter().take(count) {
        maze.map.insert(cell, RoomType::DeadEnd);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Six cells around a 3x2 ring, doored as a path; the two remaining
    /// adjacencies are the loop candidates.
    fn ring_path_fixture() -> Maze {
        let path = [
            Coord::new(0, 0),
            Coord::new(1, 0),
            Coord::new(2, 0),
            Coord::new(2, 1),
            Coord::new(1, 1),
            Coord::new(0, 1),
        ];
        let mut maze = Maze::new();
        maze.map.insert(path[0], RoomType::Start);
        for &c in &path[1..] {
            maze.map.insert(c, RoomType::Regular);
        }
        for pair in path.windows(2) {
            maze.doors
                .insert(CoordPair::new(pair[0], pair[1]), DoorType::Door);
        }
        maze
    }

    #[test]
    fn test_loop_injection_picks_longest_cycle() {
        let mut maze = ring_path_fixture();
        inject_loops(&mut maze, 1);

        // (0,0)-(0,1) closes a 6-cycle (distance 5); (1,0)-(1,1) only a
        // 4-cycle (distance 3).
        let far = CoordPair::new(Coord::new(0, 0), Coord::new(0, 1));
        let near = CoordPair::new(Coord::new(1, 0), Coord::new(1, 1));
        assert_eq!(maze.doors.get(&far), Some(&DoorType::Door));
        assert_eq!(maze.doors.get(&near), None);
    }

    #[test]
    fn test_loop_injection_stops_when_exhausted() {
        let mut maze = ring_path_fixture();
        let before = maze.doors.len();
        inject_loops(&mut maze, 10);
        // Only two candidate adjacencies exist.
        assert_eq!(maze.doors.len(), before + 2);
    }

    #[test]
    fn test_fake_doors_use_leftover_adjacencies() {
        let mut maze = ring_path_fixture();
        let mut rng = MazeRng::new(3);
        inject_fake_doors(&mut maze, &mut rng, 2);
        let fakes = maze
            .doors
            .values()
            .filter(|&&d| d == DoorType::Fake)
            .count();
        assert_eq!(fakes, 2);
        // Connectivity is untouched.
        assert_eq!(maze.distances(START).len(), 6);
        for c in maze.map.keys() {
            assert!(maze.degree(*c) <= 2);
        }
    }

    #[test]
    fn test_dead_end_shortfall_fails_attempt() {
        let mut maze = Maze::new();
        maze.map.insert(START, RoomType::Start);
        maze.map.insert(Coord::new(1, 0), RoomType::Regular);
        maze.doors.insert(
            CoordPair::new(START, Coord::new(1, 0)),
            DoorType::Door,
        );

        let err = mark_dead_ends(&mut maze, 5).unwrap_err();
        assert_eq!(
            err,
            AttemptError::InsufficientDeadEnds {
                found: 1,
                needed: 5
            }
        );
    }

    #[test]
    fn test_dead_ends_marked_farthest_first() {
        // Start with three leaves at distances 1, 2 and 3.
        let mut maze = Maze::new();
        maze.map.insert(START, RoomType::Start);
        let arm = [Coord::new(1, 0), Coord::new(2, 0), Coord::new(3, 0)];
        let mut prev = START;
        for &c in &arm {
            maze.map.insert(c, RoomType::Regular);
            maze.doors.insert(CoordPair::new(prev, c), DoorType::Door);
            prev = c;
        }
        let leaf = Coord::new(0, 1);
        maze.map.insert(leaf, RoomType::Regular);
        maze.doors.insert(CoordPair::new(START, leaf), DoorType::Door);

        mark_dead_ends(&mut maze, 1).unwrap();
        // Only the farthest leaf gets re-tagged.
        assert_eq!(maze.map[&Coord::new(3, 0)], RoomType::DeadEnd);
        assert_eq!(maze.map[&leaf], RoomType::Regular);
    }

    #[test]
    fn test_boss_room_attaches_to_farthest_cell() {
        let mut maze = Maze::new();
        maze.map.insert(START, RoomType::Start);
        let mut prev = START;
        for x in 1..=4 {
            let c = Coord::new(x, 0);
            maze.map.insert(c, RoomType::Regular);
            maze.doors.insert(CoordPair::new(prev, c), DoorType::Door);
            prev = c;
        }
        let mut rng = MazeRng::new(11);
        place_boss_room(&mut maze, &mut rng).unwrap();

        // Exactly one boss anchor, nine boss cells.
        let anchors = maze
            .map
            .values()
            .filter(|&&t| t == RoomType::Boss3)
            .count();
        assert_eq!(anchors, 1);
        let boss_cells = maze
            .map
            .keys()
            .filter(|&&c| maze.resolved_type(c) == Some(RoomType::Boss3))
            .count();
        assert_eq!(boss_cells, 9);

        // Doored to the farthest cell of the corridor.
        let end = Coord::new(4, 0);
        let connected = end.neighbors().iter().any(|&n| {
            maze.resolved_type(n) == Some(RoomType::Boss3)
                && maze.doors.get(&CoordPair::new(end, n)) == Some(&DoorType::Door)
        });
        assert!(connected);
    }

    #[test]
    fn test_growth_reaches_target_connected() {
        let mut maze = Maze::new();
        maze.map.insert(START, RoomType::Start);
        let mut rng = MazeRng::new(7);
        grow_to(&mut maze, &mut rng, 20).unwrap();

        assert!(maze.room_count() >= 20);
        assert_eq!(maze.distances(START).len(), maze.room_count());
    }

    #[test]
    fn test_full_generation_postconditions() {
        let config = GenConfig::default();
        let mut rng = MazeRng::new(2024);
        let maze = generate(&config, &mut rng).unwrap();

        // Growth target reached; everything reachable from start.
        assert!(maze.room_count() >= config.final_growth_target);
        assert_eq!(maze.distances(START).len(), maze.room_count());

        // Exactly one start, one boss footprint of nine cells.
        let starts = maze
            .map
            .values()
            .filter(|&&t| t == RoomType::Start)
            .count();
        assert_eq!(starts, 1);
        let boss_cells = maze
            .map
            .keys()
            .filter(|&&c| maze.resolved_type(c) == Some(RoomType::Boss3))
            .count();
        assert_eq!(boss_cells, 9);

        // Dead ends: exactly the configured count, all leaves.
        let dead_ends: Vec<Coord> = maze
            .map
            .iter()
            .filter(|(_, &t)| t == RoomType::DeadEnd)
            .map(|(&c, _)| c)
            .collect();
        assert_eq!(dead_ends.len(), config.dead_ends);
        for c in dead_ends {
            assert_eq!(maze.degree(c), 1);
        }

        // Fake doors: exactly the configured count, on otherwise unused
        // adjacencies.
        let fakes = maze
            .doors
            .values()
            .filter(|&&d| d == DoorType::Fake)
            .count();
        assert_eq!(fakes, config.fake_doors);

        // Each placement contributes exactly one real door, plus the
        // injected loops.
        let placements = maze
            .map
            .values()
            .filter(|t| t.anchor_step().is_none())
            .count()
            - 1; // the start cell is not placed
        let doors = maze
            .doors
            .values()
            .filter(|&&d| d == DoorType::Door)
            .count();
        assert_eq!(doors, placements + config.loops);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = GenConfig::default();
        let maze1 = generate(&config, &mut MazeRng::new(99)).unwrap();
        let maze2 = generate(&config, &mut MazeRng::new(99)).unwrap();
        assert_eq!(maze1, maze2);

        let maze3 = generate(&config, &mut MazeRng::new(100)).unwrap();
        assert_ne!(maze1, maze3);
    }

    #[test]
    fn test_every_door_joins_occupied_cells() {
        let maze = generate(&GenConfig::default(), &mut MazeRng::new(5)).unwrap();
        for pair in maze.doors.keys() {
            assert!(maze.is_occupied(pair.low()));
            assert!(maze.is_occupied(pair.high()));
            assert!(pair.low().is_adjacent(pair.high()));
        }
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = GenConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: GenConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    proptest! {
        // Attempts are cheap, so a spread of seeds keeps the structural
        // invariants honest.
        #![proptest_config(ProptestConfig::with_cases(16))]
        #[test]
        fn generated_mazes_are_well_formed(seed in 0u64..10_000) {
            let maze = generate(&GenConfig::default(), &mut MazeRng::new(seed)).unwrap();

            // Connected, and every cell resolves to a real room type.
            prop_assert_eq!(maze.distances(START).len(), maze.room_count());
            for &c in maze.map.keys() {
                let ty = maze.resolved_type(c);
                prop_assert!(ty.is_some());
                prop_assert!(ty.unwrap().anchor_step().is_none());
            }
        }
    }
}
