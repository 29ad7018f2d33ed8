//! Path planning on the occupancy grid.
//!
//! ```rust,ignore
//! use disha_map::pathfinding::{AStarConfig, AStarPlanner};
//!
//! let planner = AStarPlanner::new(AStarConfig::default());
//! let path = planner.find_path(&arena.occupancy_grid(), start, goal);
//! if path.is_empty() {
//!     println!("goal unreachable");
//! }
//! ```

pub mod astar;

pub use astar::{AStarConfig, AStarPlanner, PathFailure, PathResult, PlanStats, find_path};
