//! End-to-end occlusion runs through the simulation runner.

use crossbeam_channel::unbounded;
use disha_map::{
    AgentKind, AnchorSet, Arena, ArenaEvent, Direction, DiscoveredMap, ObstacleId, Position, Rect,
    RecordingObserver,
};
use disha_nav::{
    CancelToken, Command, ExplorationConfig, ExplorationController, ExplorationError,
    ExplorationOutcome, ExplorationStep, KnowledgeMode, MapKnowledge, NavConfig, OcclusionRequest,
    Parameter, Simulation, World,
};

fn noiseless_config() -> NavConfig {
    let mut config = NavConfig::default();
    config.localization.error_percentage = 0.0;
    config.simulation.seed = 17;
    config
}

fn resolve(sim: &mut Simulation, mode: KnowledgeMode) -> Option<ExplorationOutcome> {
    sim.submit(Command::ResolveOcclusion { mode: Some(mode) }).unwrap();
    sim.run_until_outcome(2_000)
}

#[test]
fn known_map_run_stops_short_of_the_human() {
    let mut sim = Simulation::new(noiseless_config()).unwrap();
    assert_eq!(resolve(&mut sim, KnowledgeMode::Known), Some(ExplorationOutcome::Reached));

    let robot = sim.world().true_position(sim.robot()).unwrap();
    assert_eq!(robot, Position::new(14.0, 95.0));
    assert_eq!(sim.controller().progress().plans, 1);
    assert_eq!(sim.controller().progress().moves, 5);
}

#[test]
fn unknown_map_run_explores_then_reaches() {
    let mut sim = Simulation::new(noiseless_config()).unwrap();
    assert_eq!(resolve(&mut sim, KnowledgeMode::Unknown), Some(ExplorationOutcome::Reached));

    let robot = sim.world().true_position(sim.robot()).unwrap();
    let human = sim.world().true_position(sim.human()).unwrap();
    assert!(robot.distance(&human) <= 5.0);
    assert!(sim.controller().progress().frontier_iterations >= 1);
    assert!(sim.controller().discovered_map().counts().free > 0);
}

#[test]
fn fully_known_seed_plans_once() {
    let config = noiseless_config();
    let mut arena = Arena::new(config.arena.clone());
    for rect in &config.obstacles {
        arena.add_obstacle(*rect).unwrap();
    }
    let mut world =
        World::new(arena, AnchorSet::default_triangle(), &config.localization, 5).unwrap();
    let robot = world.spawn(AgentKind::Robot, config.robot.start, config.robot.radius);
    world.spawn(AgentKind::Human, config.human.start, config.human.radius);
    let seed = DiscoveredMap::from_occupancy(&world.arena().occupancy_grid());

    let mut controller = ExplorationController::new(ExplorationConfig::default());
    controller.start(
        OcclusionRequest {
            goal: config.human.start,
            knowledge: MapKnowledge::Unknown { seed: Some(seed) },
        },
        CancelToken::new(),
    );

    let mut outcome = None;
    for _ in 0..100 {
        if let ExplorationStep::Done(done) = controller.step(&mut world.handle(robot)) {
            outcome = Some(done);
            break;
        }
    }
    assert_eq!(outcome, Some(ExplorationOutcome::Reached));
    assert_eq!(controller.progress().plans, 1);
    assert_eq!(controller.progress().frontier_iterations, 0);
}

#[test]
fn cancel_command_ends_the_run() {
    let mut sim = Simulation::new(noiseless_config()).unwrap();
    sim.submit(Command::ResolveOcclusion {
        mode: Some(KnowledgeMode::Known),
    })
    .unwrap();
    sim.submit(Command::Cancel).unwrap();
    assert_eq!(sim.run_until_outcome(100), Some(ExplorationOutcome::Cancelled));
    assert_eq!(
        sim.world().true_position(sim.robot()),
        Some(Position::new(5.0, 95.0))
    );
}

#[test]
fn reissuing_cancels_the_previous_run() {
    let mut sim = Simulation::new(noiseless_config()).unwrap();
    sim.submit(Command::ResolveOcclusion {
        mode: Some(KnowledgeMode::Unknown),
    })
    .unwrap();
    let first = sim.cancel_token();

    sim.submit(Command::ResolveOcclusion {
        mode: Some(KnowledgeMode::Known),
    })
    .unwrap();
    assert!(first.is_cancelled());
    assert!(!sim.cancel_token().is_cancelled());
    assert_eq!(sim.controller().mode(), KnowledgeMode::Known);
    assert_eq!(resolve(&mut sim, KnowledgeMode::Known), Some(ExplorationOutcome::Reached));
}

#[test]
fn walled_in_human_is_unreachable() {
    let mut config = noiseless_config();
    // Box the human in at (20, 95)
    config.obstacles.push(Rect::new(16.0, 91.0, 10.0, 2.0));
    config.obstacles.push(Rect::new(14.0, 91.0, 2.0, 9.0));
    config.obstacles.push(Rect::new(24.0, 91.0, 2.0, 9.0));
    let mut sim = Simulation::new(config).unwrap();

    let outcome = resolve(&mut sim, KnowledgeMode::Known);
    assert!(matches!(
        outcome,
        Some(ExplorationOutcome::Unreachable(ExplorationError::PlanNotFound { .. }))
    ));
}

#[test]
fn commands_arrive_over_the_channel() {
    let (tx, rx) = unbounded();
    let mut sim = Simulation::new(noiseless_config()).unwrap();
    sim.attach_commands(rx);

    tx.send("human up".parse().unwrap()).unwrap();
    tx.send(Command::MoveRobot(Direction::Right)).unwrap();
    tx.send(Command::Quit).unwrap();
    sim.tick();

    // Human at (20, 95) sits under obstacle (0, 70, 30, 20): blocked
    assert_eq!(
        sim.world().true_position(sim.human()),
        Some(Position::new(20.0, 95.0))
    );
    assert_eq!(
        sim.world().true_position(sim.robot()),
        Some(Position::new(13.0, 95.0))
    );
    assert!(!sim.is_running());
}

#[test]
fn observer_sees_obstacles_and_moves() {
    let recorder = RecordingObserver::new();
    let mut sim =
        Simulation::with_observer(noiseless_config(), Box::new(recorder.clone())).unwrap();
    sim.submit(Command::AddObstacle(Rect::new(50.0, 65.0, 5.0, 5.0)))
        .unwrap();
    sim.submit(Command::MoveRobot(Direction::Right)).unwrap();

    let events = recorder.events();
    let placed = events
        .iter()
        .filter(|e| matches!(e, ArenaEvent::ObstaclePlaced(_)))
        .count();
    assert_eq!(placed, 12);
    assert!(events.contains(&ArenaEvent::AgentMoved(
        sim.robot(),
        Position::new(13.0, 95.0)
    )));
}

#[test]
fn invalid_commands_are_rejected() {
    let mut sim = Simulation::new(noiseless_config()).unwrap();
    assert!(sim
        .submit(Command::AddObstacle(Rect::new(95.0, 95.0, 10.0, 10.0)))
        .is_err());
    assert!(sim
        .submit(Command::RemoveObstacle(ObstacleId(999)))
        .is_err());
    assert!(sim
        .submit(Command::SetParameter(Parameter::EmaAlpha(0.0)))
        .is_err());
}
