//! Arena observer that forwards events to `tracing`.

use disha_map::geometry::Segment;
use disha_map::{AgentId, ArenaObserver, Obstacle, ObstacleId, Position};
use tracing::{debug, trace};

/// Logs every arena event at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver {
    debug_scan: bool,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log the edges considered by each motion scan.
    pub fn with_debug_scan(mut self) -> Self {
        self.debug_scan = true;
        self
    }
}

impl ArenaObserver for TracingObserver {
    fn on_obstacle_placed(&mut self, id: ObstacleId, obstacle: &Obstacle) {
        let b = obstacle.bounds;
        debug!(
            "Placed {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            id, b.x, b.y, b.width, b.height
        );
    }

    fn on_obstacle_removed(&mut self, id: ObstacleId) {
        debug!("Removed {}", id);
    }

    fn on_agent_moved(&mut self, id: AgentId, position: Position) {
        debug!("{} -> ({:.1}, {:.1})", id, position.x, position.y);
    }

    fn on_debug_scan(&mut self, edges: &[Segment]) {
        for edge in edges {
            trace!(
                "scan edge ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                edge.start.x, edge.start.y, edge.end.x, edge.end.y
            );
        }
    }

    fn debug_scan_enabled(&self) -> bool {
        self.debug_scan
    }
}
