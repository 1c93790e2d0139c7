//! gridmaze-core: procedural room-and-corridor dungeon topology.
//!
//! Generates which cells of an unbounded integer grid hold rooms, which room
//! shapes occupy which cells, and which adjacent cells are connected by real,
//! decorative, or absent doors. The crate is pure and has no I/O: all entropy
//! comes through an explicit [`MazeRng`] handle, so a seed reproduces a maze
//! bit for bit.
//!
//! Rendering, engine export and intra-room geometry are left to callers; the
//! output contract is the two mappings on [`Maze`].
//!
//! ```
//! use gridmaze_core::{generate, GenConfig, MazeRng, START};
//!
//! let mut rng = MazeRng::new(42);
//! let maze = generate(&GenConfig::default(), &mut rng).expect("attempt cap not reached");
//! assert!(maze.room_count() >= 60);
//! assert_eq!(maze.distances(START).len(), maze.room_count());
//! ```

pub mod coord;
pub mod generation;
pub mod maze;
pub mod placement;
pub mod room;

pub use coord::{Coord, CoordPair};
pub use generation::{generate, try_generate, AttemptError, GenConfig, GenerateError};
pub use gridmaze_rng::MazeRng;
pub use maze::{Maze, START};
pub use placement::{PlacementError, RoomShape};
pub use room::{DoorType, RoomType};
