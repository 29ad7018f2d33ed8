//! # Disha-Map: arena model, localization and planning
//!
//! The simulation core for a robot that must reach a moving human in a
//! bounded 2D arena of rectangular obstacles.
//!
//! ## Coordinate Frame
//!
//! Screen convention throughout:
//! - **X-right**: positive X grows to the right
//! - **Y-down**: positive Y grows downward, so "up" decreases Y
//! - Grids are indexed `[y][x]` and fixed at 100×100 cells
//!
//! ## Architecture
//!
//! - [`core`]: positions, grid coordinates, directions
//! - [`geometry`]: segment intersection and distances
//! - [`arena`]: obstacles, agents, range scan, motion primitive
//! - [`grid`]: occupancy grid and discovered map
//! - [`localization`]: anchors, UWB tags, trilateration, EMA smoothing
//! - [`pathfinding`]: A* over the occupancy grid
//! - [`events`]: observer hooks for rendering or logging
//! - [`config`]: serde configuration sections
//!
//! ## Data Flow
//!
//! ```text
//!   ┌──────────────┐  bearings   ┌───────────────┐  fixes   ┌────────────┐
//!   │   UwbTag     │────────────►│ trilaterate   │─────────►│ EmaTracker │
//!   └──────────────┘             └───────────────┘          └────────────┘
//!
//!   ┌──────────────┐  rebuild    ┌───────────────┐  path    ┌────────────┐
//!   │    Arena     │────────────►│ OccupancyGrid │─────────►│   A*       │
//!   └──────┬───────┘             └───────────────┘          └────────────┘
//!          │ scan / try_move
//!          ▼
//!   SurroundingDistances
//! ```

pub mod arena;
pub mod config;
pub mod core;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod ids;
pub mod localization;
pub mod pathfinding;

// Re-export main types at crate root
pub use arena::{
    Agent, AgentKind, Arena, ArenaError, MoveError, Obstacle, Rect, SurroundingDistances,
};
pub use config::{ArenaConfig, GridFrame, LocalizationConfig, reference_obstacles};
pub use crate::core::{Direction, GridCoord, ParseDirectionError, Position};
pub use events::{ArenaEvent, ArenaObserver, NoopObserver, RecordingObserver};
pub use grid::{CellState, DiscoveredMap, GRID_SIZE, OccupancyGrid, OccupancyGridBuilder};
pub use ids::{AgentId, IdGenerator, ObstacleId, SequentialIds, TagId};
pub use localization::{
    Anchor, AnchorSet, EmaTracker, LocalizationError, TagBearing, UwbTag, averaged_estimate,
    smooth, trilaterate,
};
pub use pathfinding::{AStarConfig, AStarPlanner, find_path};
