//! Exploration controller configuration.

use clap::ValueEnum;
use disha_map::AStarConfig;
use serde::{Deserialize, Serialize};

/// What the robot knows about the arena when a run starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeMode {
    /// Plan once on the ground-truth occupancy grid.
    #[default]
    Known,

    /// Build a discovered map from scans and explore frontiers.
    Unknown,
}

/// Exploration controller configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExplorationConfig {
    /// Default mode for occlusion requests.
    #[serde(default)]
    pub mode: KnowledgeMode,

    /// Scan radius while mapping (arena units).
    #[serde(default = "default_scan_radius")]
    pub scan_radius: f32,

    /// Scans fused per exploration iteration.
    #[serde(default = "default_scan_samples")]
    pub scan_samples: usize,

    /// Waypoints dropped from the end of every path.
    #[serde(default = "default_stop_short_cells")]
    pub stop_short_cells: usize,

    /// Visit every n-th waypoint.
    #[serde(default = "default_waypoint_stride")]
    pub waypoint_stride: usize,

    /// Distance to the goal at which frontier exploration ends (arena units).
    #[serde(default = "default_goal_proximity")]
    pub goal_proximity: f32,

    /// Frontier iterations before giving up on exploration.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Period of the controller step task.
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,

    /// Planner settings.
    #[serde(default)]
    pub astar: AStarConfig,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            mode: KnowledgeMode::default(),
            scan_radius: default_scan_radius(),
            scan_samples: default_scan_samples(),
            stop_short_cells: default_stop_short_cells(),
            waypoint_stride: default_waypoint_stride(),
            goal_proximity: default_goal_proximity(),
            max_iterations: default_max_iterations(),
            step_interval_ms: default_step_interval_ms(),
            astar: AStarConfig::default(),
        }
    }
}

fn default_scan_radius() -> f32 {
    10.0
}
fn default_scan_samples() -> usize {
    3
}
fn default_stop_short_cells() -> usize {
    5
}
fn default_waypoint_stride() -> usize {
    2
}
fn default_goal_proximity() -> f32 {
    5.0
}
fn default_max_iterations() -> usize {
    200
}
fn default_step_interval_ms() -> u64 {
    100
}
