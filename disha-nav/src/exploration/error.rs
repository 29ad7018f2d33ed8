//! Exploration error types.

use std::fmt;

use disha_map::{GridCoord, LocalizationError};

/// Reasons an occlusion run ends without reaching the goal.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorationError {
    /// A* found no route between the two cells.
    PlanNotFound {
        /// Robot cell when planning.
        start: GridCoord,
        /// Goal cell.
        goal: GridCoord,
    },

    /// No frontier could be reached with a single move.
    NoFrontiersReachable {
        /// Frontier iterations completed before the queue ran dry.
        iterations: usize,
    },

    /// The robot could not be localized.
    Localization(LocalizationError),
}

impl ExplorationError {
    /// Get a short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PlanNotFound { .. } => "PLAN_NOT_FOUND",
            Self::NoFrontiersReachable { .. } => "NO_FRONTIERS",
            Self::Localization(_) => "LOCALIZATION",
        }
    }

    /// Check if retrying later could succeed (the human or the noise may change).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PlanNotFound { .. } | Self::Localization(_))
    }
}

impl fmt::Display for ExplorationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlanNotFound { start, goal } => write!(
                f,
                "No path from ({}, {}) to ({}, {})",
                start.x, start.y, goal.x, goal.y
            ),
            Self::NoFrontiersReachable { iterations } => {
                write!(f, "No reachable frontiers after {} iterations", iterations)
            }
            Self::Localization(e) => write!(f, "Localization failed: {}", e),
        }
    }
}

impl std::error::Error for ExplorationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Localization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LocalizationError> for ExplorationError {
    fn from(e: LocalizationError) -> Self {
        Self::Localization(e)
    }
}
