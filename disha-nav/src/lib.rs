//! DishaNav - occlusion resolution for a UWB-localized robot
//!
//! Drives a simulated robot next to a human it cannot see, in a 2D arena of
//! rectangular obstacles built on [`disha_map`].
//!
//! ## Architecture
//!
//! - [`config`]: TOML configuration ([`NavConfig`])
//! - [`world`]: arena plus localization state, borrowed per agent
//! - [`source`]: capability traits the controller drives a robot through
//! - [`exploration`]: known-map following and frontier exploration
//! - [`scheduler`]: periodic task ticks and the cancellation token
//! - [`sim`]: the runner that ties it together and accepts [`Command`]s
//!
//! Everything runs on one thread. The binary optionally reads commands from
//! stdin on a second thread and forwards them over a channel.

pub mod config;
pub mod error;
pub mod exploration;
pub mod observer;
pub mod scheduler;
pub mod sim;
pub mod source;
pub mod travel;
pub mod world;

pub use config::NavConfig;
pub use error::{NavError, Result};
pub use exploration::{
    ExplorationConfig, ExplorationController, ExplorationError, ExplorationOutcome,
    ExplorationProgress, ExplorationState, ExplorationStep, KnowledgeMode, MapKnowledge,
    OcclusionRequest,
};
pub use observer::TracingObserver;
pub use scheduler::{CancelToken, Scheduler, TaskKind};
pub use sim::{Command, Parameter, ParseCommandError, Simulation};
pub use source::{Localizable, Movable, NavigationSource, Scannable};
pub use travel::TravelMap;
pub use world::{AgentHandle, World};
