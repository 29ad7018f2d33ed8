//! A* pathfinding algorithm.
//!
//! 4-connected search over an [`OccupancyGrid`] with unit step cost and a
//! Manhattan heuristic. A cell is traversable iff it is inside the grid and
//! free.

use crate::config::defaults;
use crate::core::GridCoord;
use crate::grid::OccupancyGrid;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A node in the A* search
#[derive(Clone, Debug)]
struct AStarNode {
    coord: GridCoord,
    g_cost: u32, // Cost from start
    f_cost: u32, // g_cost + heuristic
}

impl Eq for AStarNode {}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord && self.f_cost == other.f_cost && self.g_cost == other.g_cost
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; deeper nodes first on ties
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| self.g_cost.cmp(&other.g_cost))
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* pathfinding configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AStarConfig {
    /// Maximum number of nodes to expand before giving up
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: usize,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            max_iterations: defaults::max_iterations(),
        }
    }
}

/// Search statistics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Nodes popped and expanded
    pub nodes_expanded: usize,
}

/// Reason for path failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathFailure {
    /// Start or goal is outside the grid
    OutOfBounds,
    /// Goal cell is occupied
    GoalBlocked,
    /// Open set exhausted
    NoPath,
    /// Maximum iterations exceeded
    MaxIterationsExceeded,
}

/// Result of A* pathfinding
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    /// Path from start to goal inclusive (empty if no path found)
    pub path: Vec<GridCoord>,
    pub stats: PlanStats,
    /// Reason for failure (if any)
    pub failure_reason: Option<PathFailure>,
}

impl PathResult {
    fn failed(reason: PathFailure, nodes_expanded: usize) -> Self {
        Self {
            path: Vec::new(),
            stats: PlanStats { nodes_expanded },
            failure_reason: Some(reason),
        }
    }

    pub fn success(&self) -> bool {
        self.failure_reason.is_none()
    }
}

/// A* pathfinder
#[derive(Clone, Debug, Default)]
pub struct AStarPlanner {
    config: AStarConfig,
}

impl AStarPlanner {
    /// Create a new A* planner
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AStarConfig {
        &self.config
    }

    /// Shortest 4-connected path from `start` to `goal`, empty when none exists.
    pub fn find_path(
        &self,
        grid: &OccupancyGrid,
        start: GridCoord,
        goal: GridCoord,
    ) -> Vec<GridCoord> {
        self.plan(grid, start, goal).path
    }

    /// Like [`AStarPlanner::find_path`] but also reports statistics and the
    /// failure reason.
    pub fn plan(&self, grid: &OccupancyGrid, start: GridCoord, goal: GridCoord) -> PathResult {
        trace!(
            "[AStar] plan: start=({},{}) goal=({},{})",
            start.x, start.y, goal.x, goal.y
        );

        if !grid.is_valid_coord(start) || !grid.is_valid_coord(goal) {
            debug!("[AStar] FAILED: OutOfBounds - start or goal outside grid");
            return PathResult::failed(PathFailure::OutOfBounds, 0);
        }
        if !grid.is_free(goal) {
            debug!("[AStar] FAILED: GoalBlocked at ({},{})", goal.x, goal.y);
            return PathResult::failed(PathFailure::GoalBlocked, 0);
        }

        let mut open_set = BinaryHeap::new();
        let mut closed_set = HashSet::new();
        let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
        let mut g_scores: HashMap<GridCoord, u32> = HashMap::new();

        open_set.push(AStarNode {
            coord: start,
            g_cost: 0,
            f_cost: heuristic(start, goal),
        });
        g_scores.insert(start, 0);

        let mut nodes_expanded = 0;

        while let Some(current) = open_set.pop() {
            // Lazily drop entries superseded by a cheaper push
            if closed_set.contains(&current.coord) {
                continue;
            }

            nodes_expanded += 1;
            if nodes_expanded > self.config.max_iterations {
                debug!(
                    "[AStar] FAILED: MaxIterationsExceeded ({} nodes)",
                    nodes_expanded
                );
                return PathResult::failed(PathFailure::MaxIterationsExceeded, nodes_expanded);
            }

            if current.coord == goal {
                return reconstruct_path(&came_from, goal, current.g_cost, nodes_expanded);
            }
            closed_set.insert(current.coord);

            for neighbor in current.coord.neighbors_4() {
                if closed_set.contains(&neighbor) || !grid.is_free(neighbor) {
                    continue;
                }

                let tentative_g = current.g_cost + 1;
                let known_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);
                if tentative_g < known_g {
                    came_from.insert(neighbor, current.coord);
                    g_scores.insert(neighbor, tentative_g);
                    open_set.push(AStarNode {
                        coord: neighbor,
                        g_cost: tentative_g,
                        f_cost: tentative_g + heuristic(neighbor, goal),
                    });
                }
            }
        }

        debug!(
            "[AStar] FAILED: NoPath after expanding {} nodes",
            nodes_expanded
        );
        PathResult::failed(PathFailure::NoPath, nodes_expanded)
    }
}

/// Manhattan distance, admissible for unit-cost 4-connected moves
#[inline]
fn heuristic(from: GridCoord, to: GridCoord) -> u32 {
    from.manhattan_distance(&to) as u32
}

fn reconstruct_path(
    came_from: &HashMap<GridCoord, GridCoord>,
    goal: GridCoord,
    cost: u32,
    nodes_expanded: usize,
) -> PathResult {
    let mut path = Vec::with_capacity(cost as usize + 1);
    let mut current = goal;

    while let Some(&prev) = came_from.get(&current) {
        path.push(current);
        current = prev;
    }
    path.push(current); // Add start
    path.reverse();

    debug!(
        "[AStar] SUCCESS: path length={} cells, cost={}, nodes_expanded={}",
        path.len(),
        cost,
        nodes_expanded
    );

    PathResult {
        path,
        stats: PlanStats { nodes_expanded },
        failure_reason: None,
    }
}

/// Quick path finding with default configuration
pub fn find_path(grid: &OccupancyGrid, start: GridCoord, goal: GridCoord) -> Vec<GridCoord> {
    AStarPlanner::default().find_path(grid, start, goal)
}
