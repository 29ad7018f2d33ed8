//! Exploration controller implementation.

use std::collections::HashSet;

use disha_map::{
    AStarPlanner, Direction, DiscoveredMap, GridCoord, GridFrame, OccupancyGrid, Position,
};
use tracing::{debug, info, trace, warn};

use super::config::{ExplorationConfig, KnowledgeMode};
use super::error::ExplorationError;
use super::frontier::{FrontierQueue, frontier_cells};
use super::mapping::ScanMapper;
use super::state::{
    ExplorationOutcome, ExplorationProgress, ExplorationState, ExplorationStep, MapKnowledge,
    OcclusionRequest, StopReason,
};
use crate::scheduler::CancelToken;
use crate::source::NavigationSource;

/// Axis-aligned move that best closes the gap from `from` to `to`.
///
/// Picks the axis with the larger delta (ties go vertical) and the whole
/// number of units along it. `None` when that distance is zero.
pub fn dominant_move(from: Position, to: Position) -> Option<(Direction, f32)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let (direction, delta) = if dx.abs() > dy.abs() {
        (if dx > 0.0 { Direction::Right } else { Direction::Left }, dx)
    } else {
        (if dy > 0.0 { Direction::Down } else { Direction::Up }, dy)
    };
    let distance = delta.abs().floor();
    (distance > 0.0).then_some((direction, distance))
}

/// Exploration controller
///
/// Resumable state machine that brings the robot next to a goal. Each call
/// to [`ExplorationController::step`] performs one unit of work: one plan,
/// one waypoint move, or one scan/frontier iteration.
pub struct ExplorationController {
    config: ExplorationConfig,
    frame: GridFrame,
    planner: AStarPlanner,
    mapper: ScanMapper,
    state: ExplorationState,
    mode: KnowledgeMode,
    goal: Position,
    known: Option<OccupancyGrid>,
    discovered: DiscoveredMap,
    visited: HashSet<GridCoord>,
    progress: ExplorationProgress,
    cancel: CancelToken,
}

impl ExplorationController {
    /// Create a controller for a 100×100 arena (one unit per cell).
    pub fn new(config: ExplorationConfig) -> Self {
        let frame = GridFrame::default();
        Self {
            planner: AStarPlanner::new(config.astar.clone()),
            mapper: ScanMapper::new(frame, config.scan_radius),
            frame,
            state: ExplorationState::Idle,
            mode: config.mode,
            goal: Position::ZERO,
            known: None,
            discovered: DiscoveredMap::unknown(),
            visited: HashSet::new(),
            progress: ExplorationProgress::default(),
            cancel: CancelToken::new(),
            config,
        }
    }

    /// Use a different arena-to-grid scale.
    pub fn with_grid_frame(mut self, frame: GridFrame) -> Self {
        self.frame = frame;
        self.mapper = ScanMapper::new(frame, self.config.scan_radius);
        self
    }

    pub fn state(&self) -> &ExplorationState {
        &self.state
    }

    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    pub fn progress(&self) -> ExplorationProgress {
        self.progress
    }

    /// Mode of the current or last run.
    pub fn mode(&self) -> KnowledgeMode {
        self.mode
    }

    /// Discovered map of the current or last unknown-mode run.
    pub fn discovered_map(&self) -> &DiscoveredMap {
        &self.discovered
    }

    /// Cells already chosen as frontier targets in this run.
    pub fn visited_frontiers(&self) -> &HashSet<GridCoord> {
        &self.visited
    }

    /// Begin a new run, discarding any previous one.
    pub fn start(&mut self, request: OcclusionRequest, cancel: CancelToken) {
        self.goal = request.goal;
        self.cancel = cancel;
        self.visited.clear();
        self.progress = ExplorationProgress::default();

        match request.knowledge {
            MapKnowledge::Known(grid) => {
                self.mode = KnowledgeMode::Known;
                self.known = Some(grid);
                self.discovered = DiscoveredMap::unknown();
                self.state = ExplorationState::Planning;
            }
            MapKnowledge::Unknown { seed } => {
                self.mode = KnowledgeMode::Unknown;
                self.known = None;
                self.discovered = seed.unwrap_or_else(DiscoveredMap::unknown);
                self.state = ExplorationState::Exploring;
            }
        }

        info!(
            "Occlusion run started ({:?}): goal ({:.1}, {:.1})",
            self.mode, self.goal.x, self.goal.y
        );
    }

    /// Cancel the in-flight run immediately.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if self.state.is_active() {
            info!("Occlusion run cancelled in {}", self.state.name());
            self.state = ExplorationState::Cancelled;
        }
    }

    /// Perform one unit of work.
    pub fn step<R: NavigationSource + ?Sized>(&mut self, robot: &mut R) -> ExplorationStep {
        if matches!(self.state, ExplorationState::Idle) {
            return ExplorationStep::Idle;
        }
        if let Some(outcome) = self.state.outcome() {
            return ExplorationStep::Done(outcome);
        }
        if self.cancel.is_cancelled() {
            info!("Occlusion run cancelled in {}", self.state.name());
            self.state = ExplorationState::Cancelled;
            return ExplorationStep::Done(ExplorationOutcome::Cancelled);
        }

        let estimate = match robot.localize() {
            Ok(p) => p,
            Err(e) => {
                warn!("Localization failed: {}", e);
                self.state = ExplorationState::Unreachable(e.into());
                return self.report();
            }
        };

        let state = std::mem::replace(&mut self.state, ExplorationState::Idle);
        trace!(
            "step {} at ({:.1}, {:.1})",
            state.name(),
            estimate.x,
            estimate.y
        );
        self.state = match state {
            ExplorationState::Planning => self.plan_known(estimate),
            ExplorationState::Following { path, next, end } => {
                self.follow(robot, estimate, path, next, end)
            }
            ExplorationState::Exploring => self.explore(robot, estimate),
            ExplorationState::FinalPlanning { reason } => self.final_plan(estimate, reason),
            other => other,
        };
        self.report()
    }

    fn report(&self) -> ExplorationStep {
        match self.state.outcome() {
            Some(outcome) => {
                match &outcome {
                    ExplorationOutcome::Reached => info!(
                        "Goal reached: {} plans, {} frontier iterations, {} moves ({} blocked)",
                        self.progress.plans,
                        self.progress.frontier_iterations,
                        self.progress.moves,
                        self.progress.blocked_moves
                    ),
                    ExplorationOutcome::Unreachable(e) => {
                        warn!("Goal unreachable [{}]: {}", e.code(), e)
                    }
                    ExplorationOutcome::Cancelled => {}
                }
                ExplorationStep::Done(outcome)
            }
            None => ExplorationStep::Pending,
        }
    }

    // State handlers

    fn plan_known(&mut self, estimate: Position) -> ExplorationState {
        let start = self.frame.to_cell(estimate);
        let goal = self.frame.to_cell(self.goal);
        let Some(grid) = self.known.as_ref() else {
            return ExplorationState::Exploring;
        };
        self.progress.plans += 1;
        let result = self.planner.plan(grid, start, goal);
        if result.success() {
            debug!("Planned {} waypoints on ground truth", result.path.len());
            self.following(result.path)
        } else {
            ExplorationState::Unreachable(ExplorationError::PlanNotFound { start, goal })
        }
    }

    fn follow<R: NavigationSource + ?Sized>(
        &mut self,
        robot: &mut R,
        estimate: Position,
        path: Vec<GridCoord>,
        next: usize,
        end: usize,
    ) -> ExplorationState {
        let target = self.frame.to_position(path[next]);
        self.move_toward(robot, estimate, target);

        let next = next + self.config.waypoint_stride.max(1);
        if next >= end {
            ExplorationState::Reached
        } else {
            ExplorationState::Following { path, next, end }
        }
    }

    fn explore<R: NavigationSource + ?Sized>(
        &mut self,
        robot: &mut R,
        estimate: Position,
    ) -> ExplorationState {
        if estimate.distance(&self.goal) <= self.config.goal_proximity {
            // Look around once more so the last stretch is not unknown
            self.scan_and_fuse(robot, estimate);
            return ExplorationState::FinalPlanning {
                reason: StopReason::NearGoal,
            };
        }

        if let Some(path) = self.plan_discovered(estimate) {
            return self.following(path);
        }

        self.scan_and_fuse(robot, estimate);

        let mut queue = self.reachable_frontiers(robot, estimate);
        let Some(frontier) = queue.pop() else {
            debug!(
                "No reachable frontiers after {} iterations",
                self.progress.frontier_iterations
            );
            return ExplorationState::FinalPlanning {
                reason: StopReason::NoFrontiers,
            };
        };

        debug!(
            "Frontier ({}, {}) at {:.1} from goal, {} candidates left",
            frontier.cell.x,
            frontier.cell.y,
            frontier.distance_to_goal,
            queue.len()
        );
        self.visited.insert(frontier.cell);
        let target = self.frame.to_position(frontier.cell);
        self.move_toward(robot, estimate, target);

        self.progress.frontier_iterations += 1;
        if self.progress.frontier_iterations >= self.config.max_iterations {
            debug!("Iteration limit {} reached", self.config.max_iterations);
            ExplorationState::FinalPlanning {
                reason: StopReason::IterationLimit,
            }
        } else {
            ExplorationState::Exploring
        }
    }

    fn final_plan(&mut self, estimate: Position, reason: StopReason) -> ExplorationState {
        if let Some(path) = self.plan_discovered(estimate) {
            return self.following(path);
        }
        let err = match reason {
            StopReason::NoFrontiers => ExplorationError::NoFrontiersReachable {
                iterations: self.progress.frontier_iterations,
            },
            StopReason::NearGoal | StopReason::IterationLimit => ExplorationError::PlanNotFound {
                start: self.frame.to_cell(estimate),
                goal: self.frame.to_cell(self.goal),
            },
        };
        ExplorationState::Unreachable(err)
    }

    // Helpers

    /// Waypoints `1, 1+stride, …` up to `len - stop_short_cells`.
    fn following(&self, path: Vec<GridCoord>) -> ExplorationState {
        let end = path.len().saturating_sub(self.config.stop_short_cells);
        if end <= 1 {
            ExplorationState::Reached
        } else {
            ExplorationState::Following { path, next: 1, end }
        }
    }

    /// A* on the discovered map with unknown treated as occupied.
    fn plan_discovered(&mut self, estimate: Position) -> Option<Vec<GridCoord>> {
        let start = self.frame.to_cell(estimate);
        let goal = self.frame.to_cell(self.goal);
        let grid = self.discovered.to_planning_grid(&[start, goal]);
        self.progress.plans += 1;
        let result = self.planner.plan(&grid, start, goal);
        if result.success() {
            debug!("Planned {} waypoints on discovered map", result.path.len());
            Some(result.path)
        } else {
            trace!("Discovered-map plan failed: {:?}", result.failure_reason);
            None
        }
    }

    fn scan_and_fuse<R: NavigationSource + ?Sized>(&mut self, robot: &mut R, estimate: Position) {
        for _ in 0..self.config.scan_samples {
            let readings = robot.scan(self.config.scan_radius);
            self.mapper.fuse(&mut self.discovered, estimate, &readings);
        }
    }

    /// Unvisited frontiers the robot can reach with a single move.
    fn reachable_frontiers<R: NavigationSource + ?Sized>(
        &self,
        robot: &R,
        estimate: Position,
    ) -> FrontierQueue {
        let candidates = frontier_cells(&self.discovered)
            .into_iter()
            .filter(|cell| !self.visited.contains(cell))
            .filter(|cell| {
                dominant_move(estimate, self.frame.to_position(*cell))
                    .is_some_and(|(direction, distance)| robot.can_move(direction, distance))
            });
        FrontierQueue::new(candidates, self.goal, &self.frame)
    }

    /// Issue one motion command toward `target` from the live estimate.
    fn move_toward<R: NavigationSource + ?Sized>(
        &mut self,
        robot: &mut R,
        estimate: Position,
        target: Position,
    ) {
        let Some((direction, distance)) = dominant_move(estimate, target) else {
            trace!("Already at ({:.1}, {:.1})", target.x, target.y);
            return;
        };
        self.progress.moves += 1;
        match robot.move_by(direction, distance) {
            Ok(p) => debug!("Moved {} {:.0} to ({:.1}, {:.1})", direction, distance, p.x, p.y),
            Err(e) => {
                self.progress.blocked_moves += 1;
                warn!("{}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;
    use disha_map::{
        AgentId, AgentKind, AnchorSet, Arena, ArenaConfig, CellState, LocalizationConfig,
        LocalizationError, Rect, reference_obstacles,
    };

    fn world() -> (World, AgentId) {
        let mut arena = Arena::new(ArenaConfig::default());
        for rect in reference_obstacles() {
            arena.add_obstacle(rect).unwrap();
        }
        let localization = LocalizationConfig {
            error_percentage: 0.0,
            ..Default::default()
        };
        let mut world =
            World::new(arena, AnchorSet::default_triangle(), &localization, 3).unwrap();
        let robot = world.spawn(AgentKind::Robot, Position::new(5.0, 95.0), 1.0);
        (world, robot)
    }

    fn run(
        controller: &mut ExplorationController,
        world: &mut World,
        robot: AgentId,
    ) -> ExplorationOutcome {
        for _ in 0..1000 {
            if let ExplorationStep::Done(outcome) = controller.step(&mut world.handle(robot)) {
                return outcome;
            }
        }
        panic!("controller did not finish");
    }

    fn goal() -> Position {
        Position::new(20.0, 95.0)
    }

    #[test]
    fn test_dominant_move() {
        let from = Position::new(5.0, 95.0);
        assert_eq!(
            dominant_move(from, Position::new(15.0, 95.0)),
            Some((Direction::Right, 10.0))
        );
        assert_eq!(
            dominant_move(from, Position::new(5.0, 90.5)),
            Some((Direction::Up, 4.0))
        );
        // Ties go vertical
        assert_eq!(
            dominant_move(from, Position::new(2.0, 98.0)),
            Some((Direction::Down, 3.0))
        );
        assert_eq!(dominant_move(from, Position::new(5.6, 95.2)), None);
    }

    #[test]
    fn test_idle_until_started() {
        let (mut world, robot) = world();
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        assert_eq!(
            controller.step(&mut world.handle(robot)),
            ExplorationStep::Idle
        );
    }

    #[test]
    fn test_known_mode_stops_short() {
        let (mut world, robot) = world();
        let grid = world.arena().occupancy_grid();
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        controller.start(
            OcclusionRequest {
                goal: goal(),
                knowledge: MapKnowledge::Known(grid),
            },
            CancelToken::new(),
        );

        assert_eq!(run(&mut controller, &mut world, robot), ExplorationOutcome::Reached);
        assert_eq!(world.true_position(robot), Some(Position::new(14.0, 95.0)));
        let progress = controller.progress();
        assert_eq!(progress.plans, 1);
        assert_eq!(progress.moves, 5);
        assert_eq!(progress.blocked_moves, 0);
    }

    #[test]
    fn test_follow_moves_from_live_estimate() {
        let (mut world, robot) = world();
        let grid = world.arena().occupancy_grid();
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        controller.start(
            OcclusionRequest {
                goal: goal(),
                knowledge: MapKnowledge::Known(grid),
            },
            CancelToken::new(),
        );

        // Plan, then the first waypoint at x = 6
        assert_eq!(controller.step(&mut world.handle(robot)), ExplorationStep::Pending);
        assert_eq!(controller.step(&mut world.handle(robot)), ExplorationStep::Pending);
        assert_eq!(world.true_position(robot), Some(Position::new(6.0, 95.0)));

        // Pushed back two units; the next waypoint is x = 8
        world
            .arena_mut()
            .place_agent(robot, Position::new(4.0, 95.0))
            .unwrap();
        assert_eq!(controller.step(&mut world.handle(robot)), ExplorationStep::Pending);
        assert_eq!(world.true_position(robot), Some(Position::new(8.0, 95.0)));
    }

    #[test]
    fn test_blocked_moves_do_not_end_the_run() {
        let (mut world, robot) = world();
        // Stale map: the wall across row 95 is missing from it
        world
            .arena_mut()
            .add_obstacle(Rect::new(9.0, 92.0, 2.0, 6.0))
            .unwrap();
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        controller.start(
            OcclusionRequest {
                goal: goal(),
                knowledge: MapKnowledge::Known(OccupancyGrid::free()),
            },
            CancelToken::new(),
        );

        assert_eq!(run(&mut controller, &mut world, robot), ExplorationOutcome::Reached);
        assert_eq!(world.true_position(robot), Some(Position::new(6.0, 95.0)));
        let progress = controller.progress();
        assert_eq!(progress.moves, 5);
        assert_eq!(progress.blocked_moves, 4);
    }

    #[test]
    fn test_known_mode_unreachable_goal() {
        let (mut world, robot) = world();
        let grid = world.arena().occupancy_grid();
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        // Inside obstacle (60, 40, 30, 35)
        controller.start(
            OcclusionRequest {
                goal: Position::new(70.0, 50.0),
                knowledge: MapKnowledge::Known(grid),
            },
            CancelToken::new(),
        );
        let outcome = run(&mut controller, &mut world, robot);
        assert!(matches!(
            outcome,
            ExplorationOutcome::Unreachable(ExplorationError::PlanNotFound { .. })
        ));
        assert_eq!(world.true_position(robot), Some(Position::new(5.0, 95.0)));
    }

    #[test]
    fn test_unknown_mode_reaches_nearby_goal() {
        let (mut world, robot) = world();
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        controller.start(
            OcclusionRequest {
                goal: goal(),
                knowledge: MapKnowledge::Unknown { seed: None },
            },
            CancelToken::new(),
        );

        assert_eq!(run(&mut controller, &mut world, robot), ExplorationOutcome::Reached);
        assert_eq!(world.true_position(robot), Some(Position::new(15.0, 95.0)));
        assert_eq!(controller.progress().frontier_iterations, 1);
        assert!(controller.visited_frontiers().contains(&GridCoord::new(15, 95)));
        let map = controller.discovered_map();
        assert_eq!(map.get(GridCoord::new(25, 95)), CellState::Free);
        // Obstacle (0, 70, 30, 20) ends at y = 90
        assert_eq!(map.get(GridCoord::new(5, 90)), CellState::Free);
        assert_eq!(map.get(GridCoord::new(5, 89)), CellState::Occupied);
    }

    #[test]
    fn test_fully_known_seed_needs_no_frontiers() {
        let (mut world, robot) = world();
        let seed = DiscoveredMap::from_occupancy(&world.arena().occupancy_grid());
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        controller.start(
            OcclusionRequest {
                goal: goal(),
                knowledge: MapKnowledge::Unknown { seed: Some(seed) },
            },
            CancelToken::new(),
        );

        assert_eq!(run(&mut controller, &mut world, robot), ExplorationOutcome::Reached);
        assert_eq!(controller.progress().plans, 1);
        assert_eq!(controller.progress().frontier_iterations, 0);
    }

    #[test]
    fn test_iteration_limit_hands_over_to_final_planning() {
        let (mut world, robot) = world();
        let config = ExplorationConfig {
            max_iterations: 1,
            ..Default::default()
        };
        let mut controller = ExplorationController::new(config);
        // Far goal: one frontier iteration cannot reveal a route
        controller.start(
            OcclusionRequest {
                goal: Position::new(95.0, 5.0),
                knowledge: MapKnowledge::Unknown { seed: None },
            },
            CancelToken::new(),
        );
        let outcome = run(&mut controller, &mut world, robot);
        assert!(matches!(
            outcome,
            ExplorationOutcome::Unreachable(ExplorationError::PlanNotFound { .. })
        ));
        assert_eq!(controller.progress().frontier_iterations, 1);
    }

    #[test]
    fn test_cancel_token_stops_before_next_step() {
        let (mut world, robot) = world();
        let grid = world.arena().occupancy_grid();
        let token = CancelToken::new();
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        controller.start(
            OcclusionRequest {
                goal: goal(),
                knowledge: MapKnowledge::Known(grid),
            },
            token.clone(),
        );

        assert_eq!(
            controller.step(&mut world.handle(robot)),
            ExplorationStep::Pending
        );
        token.cancel();
        assert_eq!(
            controller.step(&mut world.handle(robot)),
            ExplorationStep::Done(ExplorationOutcome::Cancelled)
        );
        assert_eq!(controller.state(), &ExplorationState::Cancelled);
        // Planned but never moved
        assert_eq!(world.true_position(robot), Some(Position::new(5.0, 95.0)));
    }

    #[test]
    fn test_localization_failure_is_unreachable() {
        let (mut world, _) = world();
        let mut controller = ExplorationController::new(ExplorationConfig::default());
        controller.start(
            OcclusionRequest {
                goal: goal(),
                knowledge: MapKnowledge::Unknown { seed: None },
            },
            CancelToken::new(),
        );
        let ghost = AgentId(42);
        assert_eq!(
            controller.step(&mut world.handle(ghost)),
            ExplorationStep::Done(ExplorationOutcome::Unreachable(
                ExplorationError::Localization(LocalizationError::UnknownTarget(ghost))
            ))
        );
    }
}
