//! Observer interface for arena changes.
//!
//! The arena never renders anything itself. Whoever composes the simulation
//! injects an [`ArenaObserver`] and draws, logs, or records from the callbacks.

use std::sync::{Arc, Mutex};

use crate::arena::Obstacle;
use crate::core::Position;
use crate::geometry::Segment;
use crate::ids::{AgentId, ObstacleId};

/// Fire-and-forget notifications emitted by [`crate::arena::Arena`].
pub trait ArenaObserver: Send {
    /// An obstacle was added.
    fn on_obstacle_placed(&mut self, id: ObstacleId, obstacle: &Obstacle);

    /// An obstacle was removed.
    fn on_obstacle_removed(&mut self, id: ObstacleId);

    /// An agent changed position.
    fn on_agent_moved(&mut self, id: AgentId, position: Position);

    /// Obstacle edges considered by the last scan.
    ///
    /// Only called when [`ArenaObserver::debug_scan_enabled`] returns true.
    fn on_debug_scan(&mut self, _edges: &[Segment]) {}

    /// Whether scans should report their considered edges.
    fn debug_scan_enabled(&self) -> bool {
        false
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ArenaObserver for NoopObserver {
    fn on_obstacle_placed(&mut self, _id: ObstacleId, _obstacle: &Obstacle) {}
    fn on_obstacle_removed(&mut self, _id: ObstacleId) {}
    fn on_agent_moved(&mut self, _id: AgentId, _position: Position) {}
}

/// A recorded arena event.
#[derive(Clone, Debug, PartialEq)]
pub enum ArenaEvent {
    ObstaclePlaced(ObstacleId),
    ObstacleRemoved(ObstacleId),
    AgentMoved(AgentId, Position),
    DebugScan(Vec<Segment>),
}

/// Observer that keeps every event for later inspection.
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to the arena.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ArenaEvent>>>,
    debug_scan: bool,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also record the edges considered by each scan.
    pub fn with_debug_scan(mut self) -> Self {
        self.debug_scan = true;
        self
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<ArenaEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: ArenaEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl ArenaObserver for RecordingObserver {
    fn on_obstacle_placed(&mut self, id: ObstacleId, _obstacle: &Obstacle) {
        self.push(ArenaEvent::ObstaclePlaced(id));
    }

    fn on_obstacle_removed(&mut self, id: ObstacleId) {
        self.push(ArenaEvent::ObstacleRemoved(id));
    }

    fn on_agent_moved(&mut self, id: AgentId, position: Position) {
        self.push(ArenaEvent::AgentMoved(id, position));
    }

    fn on_debug_scan(&mut self, edges: &[Segment]) {
        self.push(ArenaEvent::DebugScan(edges.to_vec()));
    }

    fn debug_scan_enabled(&self) -> bool {
        self.debug_scan
    }
}
