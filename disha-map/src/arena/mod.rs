//! The occupancy model: obstacles, agents, scanning and motion.
//!
//! [`Arena`] is the ground truth of the simulation. It answers range scans,
//! rebuilds the occupancy grid on demand and moves agents only when the
//! scanner reports the way is clear.
//!
//! ```rust,ignore
//! use disha_map::arena::{AgentKind, Arena, Rect};
//!
//! let mut arena = Arena::new(ArenaConfig::default());
//! arena.add_obstacle(Rect::new(10.0, 20.0, 15.0, 15.0))?;
//! let robot = arena.add_agent(AgentKind::Robot, Position::new(5.0, 95.0), 1.0);
//! arena.try_move(robot, Direction::Right, 8.0)?;
//! ```

mod agent;
mod error;
mod motion;
mod obstacle;
mod scan;

pub use agent::{Agent, AgentKind};
pub use error::{ArenaError, MoveError};
pub use obstacle::{Obstacle, Rect};
pub use scan::{ScanReport, Scanner, SurroundingDistances, bucket_for_angle};

use log::debug;

use crate::config::ArenaConfig;
use crate::core::Position;
use crate::events::{ArenaObserver, NoopObserver};
use crate::grid::{OccupancyGrid, OccupancyGridBuilder};
use crate::ids::{AgentId, IdGenerator, ObstacleId, SequentialIds, TagId};

/// Obstacles and agents in a bounded arena.
pub struct Arena {
    config: ArenaConfig,
    obstacles: Vec<Obstacle>,
    agents: Vec<Agent>,
    observer: Box<dyn ArenaObserver>,
    ids: Box<dyn IdGenerator>,
}

impl Arena {
    /// Empty arena with a no-op observer and sequential ids.
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            config,
            obstacles: Vec::new(),
            agents: Vec::new(),
            observer: Box::new(NoopObserver),
            ids: Box::new(SequentialIds::new()),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ArenaObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn ArenaObserver>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.config.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.config.height
    }

    // ─────────────────────────────────────────────────────────────────────
    // Obstacles
    // ─────────────────────────────────────────────────────────────────────

    /// Place an obstacle. It must fit inside the arena with positive size.
    pub fn add_obstacle(&mut self, bounds: Rect) -> Result<ObstacleId, ArenaError> {
        bounds.validate(self.config.width, self.config.height)?;
        let id = ObstacleId(self.ids.next_id());
        let obstacle = Obstacle::new(id, bounds);
        self.observer.on_obstacle_placed(id, &obstacle);
        self.obstacles.push(obstacle);
        debug!(
            "[Arena] placed {} at ({}, {}) {}x{}",
            id, bounds.x, bounds.y, bounds.width, bounds.height
        );
        Ok(id)
    }

    /// Remove an obstacle by id.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        let removed = self.obstacles.remove(index);
        self.observer.on_obstacle_removed(id);
        debug!("[Arena] removed {}", id);
        Some(removed)
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    // ─────────────────────────────────────────────────────────────────────
    // Agents
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_agent(&mut self, kind: AgentKind, position: Position, radius: f32) -> AgentId {
        let id = AgentId(self.ids.next_id());
        self.agents.push(Agent::new(id, kind, position, radius));
        self.observer.on_agent_moved(id, position);
        debug!(
            "[Arena] added {} {} at ({:.1}, {:.1})",
            kind, id, position.x, position.y
        );
        id
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub(crate) fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn attach_tag(&mut self, agent: AgentId, tag: TagId) -> Result<(), ArenaError> {
        let a = self
            .agent_mut(agent)
            .ok_or(ArenaError::UnknownAgent(agent))?;
        a.tag = Some(tag);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sensing
    // ─────────────────────────────────────────────────────────────────────

    pub fn scanner(&self) -> Scanner {
        Scanner::new(self.config.width, self.config.height, self.config.scan_margin)
    }

    /// Scan without notifying the observer.
    pub fn probe(&self, origin: Position, radius: f32) -> ScanReport {
        self.scanner()
            .scan(self.obstacles.iter().map(|o| &o.bounds), origin, radius)
    }

    /// Distance to the nearest obstacle edge or wall in each direction.
    ///
    /// Readings are 0 when nothing lies within `radius`. A non-positive
    /// radius yields all zeros.
    pub fn surrounding_distances(&mut self, origin: Position, radius: f32) -> SurroundingDistances {
        let report = self.probe(origin, radius);
        if self.observer.debug_scan_enabled() {
            self.observer.on_debug_scan(&report.considered);
        }
        report.distances
    }

    /// Fresh binary grid of the current obstacles and agents.
    pub fn occupancy_grid(&self) -> OccupancyGrid {
        let mut builder = OccupancyGridBuilder::new(self.config.grid_frame());
        for obstacle in &self.obstacles {
            builder = builder.rect(&obstacle.bounds);
        }
        builder = builder.boundary().inflate(self.config.inflation_factor);
        for agent in &self.agents {
            builder = builder.carve(agent.position, self.config.footprint_clearance);
        }
        builder.build()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Parameters
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_inflation_factor(&mut self, k: usize) {
        self.config.inflation_factor = k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridCoord;
    use crate::events::{ArenaEvent, RecordingObserver};
    use crate::grid::GRID_SIZE;

    #[test]
    fn test_add_and_remove_obstacle() {
        let recorder = RecordingObserver::new();
        let mut arena =
            Arena::new(ArenaConfig::default()).with_observer(Box::new(recorder.clone()));

        let id = arena.add_obstacle(Rect::new(10.0, 20.0, 15.0, 15.0)).unwrap();
        assert_eq!(arena.obstacles().len(), 1);
        assert!(arena.remove_obstacle(id).is_some());
        assert!(arena.remove_obstacle(id).is_none());
        assert_eq!(
            recorder.events(),
            vec![
                ArenaEvent::ObstaclePlaced(id),
                ArenaEvent::ObstacleRemoved(id)
            ]
        );
    }

    struct Stride {
        next: u64,
    }

    impl IdGenerator for Stride {
        fn next_id(&mut self) -> u64 {
            self.next += 10;
            self.next
        }
    }

    #[test]
    fn test_injected_id_generator() {
        let mut arena =
            Arena::new(ArenaConfig::default()).with_id_generator(Box::new(Stride { next: 0 }));
        let obstacle = arena.add_obstacle(Rect::new(10.0, 20.0, 5.0, 5.0)).unwrap();
        let robot = arena.add_agent(AgentKind::Robot, Position::new(5.0, 95.0), 1.0);
        assert_eq!(obstacle, ObstacleId(10));
        assert_eq!(robot, AgentId(20));
    }

    #[test]
    fn test_rejects_invalid_obstacles() {
        let mut arena = Arena::new(ArenaConfig::default());
        assert!(arena.add_obstacle(Rect::new(90.0, 0.0, 20.0, 5.0)).is_err());
        assert!(arena.add_obstacle(Rect::new(10.0, 0.0, -2.0, 5.0)).is_err());
        assert!(arena.obstacles().is_empty());
    }

    #[test]
    fn test_empty_arena_grid_is_boundary_only() {
        let config = ArenaConfig {
            inflation_factor: 0,
            ..Default::default()
        };
        let grid = Arena::new(config).occupancy_grid();
        assert_eq!(grid.count_occupied(), 4 * GRID_SIZE - 4);
    }

    #[test]
    fn test_grid_carves_agent_footprint() {
        let mut arena = Arena::new(ArenaConfig::default());
        // Start cell sits inside the inflated boundary band
        arena.add_agent(AgentKind::Robot, Position::new(2.0, 50.0), 1.0);
        let grid = arena.occupancy_grid();
        assert!(grid.is_free(GridCoord::new(2, 50)));
        assert!(grid.is_free(GridCoord::new(3, 50)));
        assert!(!grid.is_free(GridCoord::new(2, 40)));
    }

    #[test]
    fn test_grid_is_rebuilt_from_current_state() {
        let mut arena = Arena::new(ArenaConfig::default());
        let before = arena.occupancy_grid();
        let id = arena.add_obstacle(Rect::new(40.0, 40.0, 5.0, 5.0)).unwrap();
        assert_ne!(arena.occupancy_grid(), before);
        arena.remove_obstacle(id);
        assert_eq!(arena.occupancy_grid(), before);
    }

    #[test]
    fn test_debug_scan_reaches_observer() {
        let recorder = RecordingObserver::new().with_debug_scan();
        let mut arena =
            Arena::new(ArenaConfig::default()).with_observer(Box::new(recorder.clone()));
        arena.add_obstacle(Rect::new(10.0, 20.0, 15.0, 15.0)).unwrap();
        arena.surrounding_distances(Position::new(10.0, 36.0), 20.0);
        let scans: Vec<_> = recorder
            .events()
            .into_iter()
            .filter(|e| matches!(e, ArenaEvent::DebugScan(_)))
            .collect();
        assert_eq!(scans.len(), 1);
    }

    #[test]
    fn test_attach_tag() {
        let mut arena = Arena::new(ArenaConfig::default());
        let human = arena.add_agent(AgentKind::Human, Position::new(20.0, 95.0), 1.0);
        arena.attach_tag(human, TagId(7)).unwrap();
        assert_eq!(arena.agent(human).and_then(|a| a.tag), Some(TagId(7)));
        assert!(arena.attach_tag(AgentId(999), TagId(1)).is_err());
    }
}
