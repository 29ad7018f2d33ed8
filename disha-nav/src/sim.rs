//! Simulation runner: owns the world, the scheduler and the controller.
//!
//! ```text
//!   stdin / tests ──► Command ──► Simulation::submit
//!                                      │
//!   tick() ──► Scheduler::due ──► SampleLocalization(agent) ──► EmaTracker + TravelMap
//!                             └─► ExplorationStep ──► ExplorationController::step
//! ```

use std::str::FromStr;

use crossbeam_channel::Receiver;
use disha_map::{
    AgentId, AgentKind, AnchorSet, Arena, ArenaError, ArenaObserver, Direction, ObstacleId,
    ParseDirectionError, Rect,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::NavConfig;
use crate::error::{NavError, Result};
use crate::exploration::{
    ExplorationController, ExplorationOutcome, ExplorationStep, KnowledgeMode, MapKnowledge,
    OcclusionRequest,
};
use crate::observer::TracingObserver;
use crate::scheduler::{CancelToken, Scheduler, TaskKind};
use crate::travel::TravelMap;
use crate::world::World;

/// Runtime-tunable parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Parameter {
    ScanRadius(f32),
    InflationFactor(usize),
    EmaAlpha(f32),
    ErrorPercentage(f32),
    AveragingSamples(usize),
    MoveSpeed(f32),
}

/// Requests accepted by [`Simulation::submit`]
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Move the robot by its configured speed
    MoveRobot(Direction),
    /// Move the human by its configured speed
    MoveHuman(Direction),
    /// Start an occlusion run toward the human, cancelling any in flight.
    /// Without a mode the configured default is used.
    ResolveOcclusion { mode: Option<KnowledgeMode> },
    /// Cancel the in-flight run
    Cancel,
    AddObstacle(Rect),
    RemoveObstacle(ObstacleId),
    SetParameter(Parameter),
    Quit,
}

/// Text command parse failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Direction(#[from] ParseDirectionError),
}

fn parse_arg<T: FromStr>(
    word: Option<&str>,
    name: &'static str,
) -> std::result::Result<T, ParseCommandError> {
    let word = word.ok_or(ParseCommandError::MissingArgument(name))?;
    word.parse()
        .map_err(|_| ParseCommandError::InvalidArgument(format!("{} = {}", name, word)))
}

fn parse_direction(word: Option<&str>) -> std::result::Result<Direction, ParseCommandError> {
    let word = word.ok_or(ParseCommandError::MissingArgument("direction"))?;
    Ok(word.parse()?)
}

impl FromStr for Command {
    type Err = ParseCommandError;

    /// Parse one line, e.g. `robot up`, `resolve unknown`, `add 10 20 5 5`,
    /// `remove 3`, `set alpha 0.2`, `quit`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().ok_or(ParseCommandError::Empty)?.to_ascii_lowercase();

        let command = match verb.as_str() {
            "robot" | "r" => Command::MoveRobot(parse_direction(words.next())?),
            "human" | "h" => Command::MoveHuman(parse_direction(words.next())?),
            "resolve" | "go" => {
                let mode = match words.next().map(str::to_ascii_lowercase).as_deref() {
                    None => None,
                    Some("known") => Some(KnowledgeMode::Known),
                    Some("unknown") => Some(KnowledgeMode::Unknown),
                    Some(other) => {
                        return Err(ParseCommandError::InvalidArgument(format!("mode = {}", other)));
                    }
                };
                Command::ResolveOcclusion { mode }
            }
            "known" => Command::ResolveOcclusion {
                mode: Some(KnowledgeMode::Known),
            },
            "unknown" => Command::ResolveOcclusion {
                mode: Some(KnowledgeMode::Unknown),
            },
            "cancel" | "stop" => Command::Cancel,
            "add" => Command::AddObstacle(Rect::new(
                parse_arg(words.next(), "x")?,
                parse_arg(words.next(), "y")?,
                parse_arg(words.next(), "width")?,
                parse_arg(words.next(), "height")?,
            )),
            "remove" => Command::RemoveObstacle(ObstacleId(parse_arg(words.next(), "id")?)),
            "set" => {
                let name = words
                    .next()
                    .ok_or(ParseCommandError::MissingArgument("parameter"))?
                    .to_ascii_lowercase();
                let parameter = match name.as_str() {
                    "scan_radius" | "radius" => {
                        Parameter::ScanRadius(parse_arg(words.next(), "value")?)
                    }
                    "inflation" | "inflation_factor" => {
                        Parameter::InflationFactor(parse_arg(words.next(), "value")?)
                    }
                    "alpha" | "ema_alpha" => {
                        Parameter::EmaAlpha(parse_arg(words.next(), "value")?)
                    }
                    "error" | "error_percentage" => {
                        Parameter::ErrorPercentage(parse_arg(words.next(), "value")?)
                    }
                    "samples" | "averaging_samples" => {
                        Parameter::AveragingSamples(parse_arg(words.next(), "value")?)
                    }
                    "speed" | "move_speed" => {
                        Parameter::MoveSpeed(parse_arg(words.next(), "value")?)
                    }
                    _ => return Err(ParseCommandError::Unknown(format!("set {}", name))),
                };
                Command::SetParameter(parameter)
            }
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Err(ParseCommandError::Unknown(verb)),
        };
        Ok(command)
    }
}

/// The whole simulation, stepped one tick at a time.
pub struct Simulation {
    config: NavConfig,
    world: World,
    robot: AgentId,
    human: AgentId,
    scheduler: Scheduler,
    controller: ExplorationController,
    cancel: CancelToken,
    travel: TravelMap,
    commands: Option<Receiver<Command>>,
    last_outcome: Option<ExplorationOutcome>,
    now_ms: u64,
    running: bool,
}

impl Simulation {
    /// Build the simulation with a [`TracingObserver`].
    ///
    /// `[simulation] debug_scan` also logs the edges behind every motion scan.
    pub fn new(config: NavConfig) -> Result<Self> {
        let observer = tracing_observer(&config);
        Self::with_observer(config, Box::new(observer))
    }

    /// Build the simulation with a caller-supplied observer.
    pub fn with_observer(config: NavConfig, observer: Box<dyn ArenaObserver>) -> Result<Self> {
        let mut arena = Arena::new(config.arena.clone()).with_observer(observer);
        for rect in &config.obstacles {
            arena.add_obstacle(*rect)?;
        }
        let anchors = AnchorSet::new(config.anchors.clone())?;
        let mut world = World::new(arena, anchors, &config.localization, config.simulation.seed)?;

        let robot = world.spawn(AgentKind::Robot, config.robot.start, config.robot.radius);
        let human = world.spawn(AgentKind::Human, config.human.start, config.human.radius);

        let mut scheduler = Scheduler::new();
        let sample_ms = config.localization.sample_interval_ms;
        scheduler.register(TaskKind::SampleLocalization(robot), sample_ms);
        scheduler.register(TaskKind::SampleLocalization(human), sample_ms);

        let mut travel = TravelMap::default();
        travel.record(robot, config.robot.start);
        travel.record(human, config.human.start);

        let controller = Self::build_controller(&config);
        info!(
            "Simulation ready: {} obstacles, robot at ({:.1}, {:.1}), human at ({:.1}, {:.1})",
            config.obstacles.len(),
            config.robot.start.x,
            config.robot.start.y,
            config.human.start.x,
            config.human.start.y
        );

        Ok(Self {
            config,
            world,
            robot,
            human,
            scheduler,
            controller,
            cancel: CancelToken::new(),
            travel,
            commands: None,
            last_outcome: None,
            now_ms: 0,
            running: true,
        })
    }

    fn build_controller(config: &NavConfig) -> ExplorationController {
        ExplorationController::new(config.exploration.clone())
            .with_grid_frame(config.arena.grid_frame())
    }

    /// Drain `commands` at the start of every tick.
    pub fn attach_commands(&mut self, commands: Receiver<Command>) {
        self.commands = Some(commands);
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn robot(&self) -> AgentId {
        self.robot
    }

    pub fn human(&self) -> AgentId {
        self.human
    }

    pub fn controller(&self) -> &ExplorationController {
        &self.controller
    }

    pub fn travel(&self) -> &TravelMap {
        &self.travel
    }

    /// Token of the current or last run.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Outcome of the last finished run, cleared when a new run starts.
    pub fn last_outcome(&self) -> Option<&ExplorationOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the clock by one tick and run whatever is due.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.now_ms += self.config.simulation.tick_ms.max(1);

        let pending: Vec<Command> = match &self.commands {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for command in pending {
            if let Err(e) = self.submit(command) {
                warn!("Command rejected: {}", e);
            }
        }

        for task in self.scheduler.due(self.now_ms) {
            self.run_task(task);
        }
    }

    /// Tick until a run finishes, the simulation quits, or `max_ticks` pass.
    pub fn run_until_outcome(&mut self, max_ticks: u64) -> Option<ExplorationOutcome> {
        for _ in 0..max_ticks {
            if self.last_outcome.is_some() || !self.running {
                break;
            }
            self.tick();
        }
        self.last_outcome.clone()
    }

    fn run_task(&mut self, task: TaskKind) {
        match task {
            TaskKind::SampleLocalization(id) => match self.world.sample(id) {
                Ok(estimate) => {
                    self.travel.record(id, estimate);
                }
                Err(e) => warn!("Sampling {} failed: {}", id, e),
            },
            TaskKind::ExplorationStep => {
                let step = self.controller.step(&mut self.world.handle(self.robot));
                if let ExplorationStep::Done(outcome) = step {
                    self.scheduler.unregister(TaskKind::ExplorationStep);
                    match &outcome {
                        ExplorationOutcome::Unreachable(e) if !e.is_recoverable() => warn!(
                            "Occlusion run failed at {} ms: [{}] {}",
                            self.now_ms,
                            e.code(),
                            e
                        ),
                        _ => info!("Occlusion run finished at {} ms: {:?}", self.now_ms, outcome),
                    }
                    self.last_outcome = Some(outcome);
                }
            }
        }
    }

    /// Apply one command immediately.
    pub fn submit(&mut self, command: Command) -> Result<()> {
        debug!("Command: {:?}", command);
        match command {
            Command::MoveRobot(direction) => {
                self.move_agent(self.robot, direction, self.config.robot.move_speed)
            }
            Command::MoveHuman(direction) => {
                self.move_agent(self.human, direction, self.config.human.move_speed)
            }
            Command::ResolveOcclusion { mode } => {
                self.resolve_occlusion(mode.unwrap_or(self.config.exploration.mode))?
            }
            Command::Cancel => self.cancel_run(),
            Command::AddObstacle(rect) => {
                let id = self.world.arena_mut().add_obstacle(rect)?;
                info!("Added {}", id);
            }
            Command::RemoveObstacle(id) => {
                self.world
                    .arena_mut()
                    .remove_obstacle(id)
                    .ok_or(ArenaError::UnknownObstacle(id))?;
                info!("Removed {}", id);
            }
            Command::SetParameter(parameter) => self.set_parameter(parameter)?,
            Command::Quit => {
                self.cancel_run();
                self.running = false;
                info!("Quit requested");
            }
        }
        Ok(())
    }

    fn move_agent(&mut self, id: AgentId, direction: Direction, distance: f32) {
        match self.world.arena_mut().try_move(id, direction, distance) {
            Ok(p) => info!("{} moved {} to ({:.1}, {:.1})", id, direction, p.x, p.y),
            Err(e) => info!("{}: {}", id, e),
        }
    }

    fn resolve_occlusion(&mut self, mode: KnowledgeMode) -> Result<()> {
        if self.controller.state().is_active() {
            info!("Replacing in-flight occlusion run");
            self.controller.cancel();
        }

        let goal = self.world.localize(self.human)?;
        let knowledge = match mode {
            KnowledgeMode::Known => MapKnowledge::Known(self.world.arena().occupancy_grid()),
            KnowledgeMode::Unknown => MapKnowledge::Unknown { seed: None },
        };

        self.cancel = CancelToken::new();
        self.controller = Self::build_controller(&self.config);
        self.controller
            .start(OcclusionRequest { goal, knowledge }, self.cancel.clone());
        self.last_outcome = None;
        self.scheduler
            .register(TaskKind::ExplorationStep, self.config.exploration.step_interval_ms);
        Ok(())
    }

    fn cancel_run(&mut self) {
        if self.controller.state().is_active() {
            self.cancel.cancel();
        }
    }

    fn set_parameter(&mut self, parameter: Parameter) -> Result<()> {
        match parameter {
            Parameter::ScanRadius(radius) => self.config.exploration.scan_radius = radius,
            Parameter::InflationFactor(k) => {
                self.config.arena.inflation_factor = k;
                self.world.arena_mut().set_inflation_factor(k);
            }
            Parameter::EmaAlpha(alpha) => {
                self.world.set_ema_alpha(alpha)?;
                self.config.localization.ema_alpha = alpha;
            }
            Parameter::ErrorPercentage(error) => {
                if error < 0.0 {
                    return Err(NavError::Config(format!(
                        "error percentage must be non-negative, got {}",
                        error
                    )));
                }
                self.config.localization.error_percentage = error;
                self.world.set_error_percentage(error);
            }
            Parameter::AveragingSamples(samples) => {
                if samples == 0 {
                    return Err(NavError::Config(
                        "averaging needs at least one sample".to_string(),
                    ));
                }
                self.config.localization.averaging_samples = samples;
                self.world.set_averaging_samples(samples);
            }
            Parameter::MoveSpeed(speed) => {
                if speed <= 0.0 {
                    return Err(NavError::Config(format!(
                        "move speed must be positive, got {}",
                        speed
                    )));
                }
                self.config.robot.move_speed = speed;
            }
        }
        info!("Parameter set: {:?}", parameter);
        Ok(())
    }
}

fn tracing_observer(config: &NavConfig) -> TracingObserver {
    let observer = TracingObserver::new();
    if config.simulation.debug_scan {
        observer.with_debug_scan()
    } else {
        observer
    }
}
