//! Exploration state machine states.

use disha_map::{DiscoveredMap, GridCoord, OccupancyGrid, Position};

use super::error::ExplorationError;

/// Map the controller starts from.
#[derive(Clone, Debug)]
pub enum MapKnowledge {
    /// Ground-truth occupancy grid.
    Known(OccupancyGrid),
    /// Explore from scratch, or from a partially discovered map.
    Unknown { seed: Option<DiscoveredMap> },
}

/// A request to bring the robot next to the goal.
#[derive(Clone, Debug)]
pub struct OcclusionRequest {
    /// Goal position in arena units.
    pub goal: Position,
    pub knowledge: MapKnowledge,
}

/// Why the unknown-mode loop handed over to final planning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Robot came within `goal_proximity` of the goal.
    NearGoal,
    /// The frontier queue was empty.
    NoFrontiers,
    /// `max_iterations` frontier iterations ran.
    IterationLimit,
}

/// Exploration state
#[derive(Clone, Debug, PartialEq)]
pub enum ExplorationState {
    /// Waiting for a request
    Idle,

    /// Known mode: plan once on the ground truth
    Planning,

    /// Visiting waypoints of a planned path
    Following {
        path: Vec<GridCoord>,
        /// Index of the next waypoint to visit
        next: usize,
        /// Waypoints at or past this index are skipped
        end: usize,
    },

    /// Unknown mode: scan, fuse and chase frontiers
    Exploring,

    /// Unknown mode: last attempt to plan on the discovered map
    FinalPlanning { reason: StopReason },

    /// Robot is next to the goal
    Reached,

    /// Gave up
    Unreachable(ExplorationError),

    /// Cancelled through the token
    Cancelled,
}

impl ExplorationState {
    /// Is this a terminal state?
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExplorationState::Reached
                | ExplorationState::Unreachable(_)
                | ExplorationState::Cancelled
        )
    }

    /// Is a run in flight?
    pub fn is_active(&self) -> bool {
        !matches!(self, ExplorationState::Idle) && !self.is_terminal()
    }

    /// State name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ExplorationState::Idle => "Idle",
            ExplorationState::Planning => "Planning",
            ExplorationState::Following { .. } => "Following",
            ExplorationState::Exploring => "Exploring",
            ExplorationState::FinalPlanning { .. } => "FinalPlanning",
            ExplorationState::Reached => "Reached",
            ExplorationState::Unreachable(_) => "Unreachable",
            ExplorationState::Cancelled => "Cancelled",
        }
    }

    /// Outcome of a terminal state
    pub fn outcome(&self) -> Option<ExplorationOutcome> {
        match self {
            ExplorationState::Reached => Some(ExplorationOutcome::Reached),
            ExplorationState::Unreachable(e) => Some(ExplorationOutcome::Unreachable(e.clone())),
            ExplorationState::Cancelled => Some(ExplorationOutcome::Cancelled),
            _ => None,
        }
    }
}

/// How a run ended
#[derive(Clone, Debug, PartialEq)]
pub enum ExplorationOutcome {
    Reached,
    Unreachable(ExplorationError),
    Cancelled,
}

/// Result of one controller step
#[derive(Clone, Debug, PartialEq)]
pub enum ExplorationStep {
    /// No run has been started
    Idle,
    /// More work remains
    Pending,
    /// The run has finished
    Done(ExplorationOutcome),
}

/// Counters for one run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExplorationProgress {
    /// A* invocations
    pub plans: usize,
    /// Unknown-mode scan/frontier iterations
    pub frontier_iterations: usize,
    /// Motion commands issued
    pub moves: usize,
    /// Motion commands refused by the arena
    pub blocked_moves: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ExplorationState::Reached.is_terminal());
        assert!(ExplorationState::Cancelled.is_terminal());
        assert!(!ExplorationState::Exploring.is_terminal());
        assert!(!ExplorationState::Idle.is_active());
        assert!(ExplorationState::Planning.is_active());
    }

    #[test]
    fn test_outcome_of_unreachable() {
        let err = ExplorationError::NoFrontiersReachable { iterations: 1 };
        assert_eq!(
            ExplorationState::Unreachable(err.clone()).outcome(),
            Some(ExplorationOutcome::Unreachable(err))
        );
        assert_eq!(ExplorationState::Exploring.outcome(), None);
    }
}
