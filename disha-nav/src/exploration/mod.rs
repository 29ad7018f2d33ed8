//! Occlusion resolution: bring the robot next to a goal it cannot see.
//!
//! Two modes, chosen per request:
//!
//! - **Known**: A* once on the ground-truth grid, then visit every
//!   `waypoint_stride`-th waypoint, stopping `stop_short_cells` early.
//! - **Unknown**: repeatedly try A* on a discovered map, and when that fails
//!   scan, fuse the readings and chase the reachable frontier nearest the
//!   goal. Final planning takes over near the goal, when no frontier is
//!   reachable, or after `max_iterations`.
//!
//! # Example
//!
//! ```ignore
//! use disha_nav::exploration::{
//!     ExplorationConfig, ExplorationController, MapKnowledge, OcclusionRequest,
//! };
//!
//! let mut controller = ExplorationController::new(ExplorationConfig::default());
//! controller.start(
//!     OcclusionRequest { goal, knowledge: MapKnowledge::Unknown { seed: None } },
//!     CancelToken::new(),
//! );
//! while let ExplorationStep::Pending = controller.step(&mut world.handle(robot)) {}
//! ```

mod config;
mod controller;
mod error;
mod frontier;
mod mapping;
mod state;

pub use config::{ExplorationConfig, KnowledgeMode};
pub use controller::{ExplorationController, dominant_move};
pub use error::ExplorationError;
pub use frontier::{Frontier, FrontierQueue, frontier_cells};
pub use mapping::ScanMapper;
pub use state::{
    ExplorationOutcome, ExplorationProgress, ExplorationState, ExplorationStep, MapKnowledge,
    OcclusionRequest, StopReason,
};
