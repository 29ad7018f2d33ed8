//! Configuration loading for DishaNav

use std::path::Path;

use disha_map::{Anchor, ArenaConfig, LocalizationConfig, Position, Rect, reference_obstacles};
use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::exploration::ExplorationConfig;

/// Main configuration structure
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub localization: LocalizationConfig,
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub human: HumanConfig,
    #[serde(default)]
    pub exploration: ExplorationConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Exactly three, not colinear
    #[serde(default = "default_anchors")]
    pub anchors: Vec<Anchor>,
    #[serde(default = "reference_obstacles")]
    pub obstacles: Vec<Rect>,
}

/// Robot agent parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Start position (default: 5, 95)
    #[serde(default = "default_robot_start")]
    pub start: Position,

    /// Body radius (default: 1.0)
    #[serde(default = "default_agent_radius")]
    pub radius: f32,

    /// Distance per manual move command (default: 8.0)
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
}

/// Human target parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HumanConfig {
    /// Start position (default: 20, 95)
    #[serde(default = "default_human_start")]
    pub start: Position,

    /// Body radius (default: 1.0)
    #[serde(default = "default_agent_radius")]
    pub radius: f32,

    /// Distance per manual move command (default: 8.0)
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
}

/// Simulation clock settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulated milliseconds per tick (default: 20)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// RNG seed for range noise, 0 draws from entropy (default: 0)
    #[serde(default)]
    pub seed: u64,

    /// Log the obstacle edges behind every motion scan (default: false)
    #[serde(default)]
    pub debug_scan: bool,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            start: default_robot_start(),
            radius: default_agent_radius(),
            move_speed: default_move_speed(),
        }
    }
}

impl Default for HumanConfig {
    fn default() -> Self {
        Self {
            start: default_human_start(),
            radius: default_agent_radius(),
            move_speed: default_move_speed(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            seed: 0,
            debug_scan: false,
        }
    }
}

// Default value functions
fn default_robot_start() -> Position {
    Position::new(5.0, 95.0)
}
fn default_human_start() -> Position {
    Position::new(20.0, 95.0)
}
fn default_agent_radius() -> f32 {
    1.0
}
fn default_move_speed() -> f32 {
    8.0
}
fn default_tick_ms() -> u64 {
    20
}
fn default_anchors() -> Vec<Anchor> {
    vec![
        Anchor::new("anchor_a", Position::new(0.0, 0.0)),
        Anchor::new("anchor_b", Position::new(99.0, 0.0)),
        Anchor::new("anchor_c", Position::new(99.0, 99.0)),
    ]
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            localization: LocalizationConfig::default(),
            robot: RobotConfig::default(),
            human: HumanConfig::default(),
            exploration: ExplorationConfig::default(),
            simulation: SimulationConfig::default(),
            anchors: default_anchors(),
            obstacles: reference_obstacles(),
        }
    }
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        let config: NavConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exploration::KnowledgeMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = NavConfig::load(file.path()).unwrap();
        assert_eq!(config.arena.width, 100.0);
        assert_eq!(config.arena.inflation_factor, 2);
        assert_eq!(config.localization.averaging_samples, 10);
        assert_eq!(config.robot.start, Position::new(5.0, 95.0));
        assert_eq!(config.human.start, Position::new(20.0, 95.0));
        assert_eq!(config.exploration.max_iterations, 200);
        assert_eq!(config.simulation.tick_ms, 20);
        assert!(!config.simulation.debug_scan);
        assert_eq!(config.anchors.len(), 3);
        assert_eq!(config.obstacles.len(), 11);
    }

    #[test]
    fn test_partial_sections() {
        let file = write_config(
            r#"
[localization]
error_percentage = 0.0

[human]
start = { x = 40.0, y = 35.0 }

[exploration]
mode = "unknown"
scan_radius = 12.5

[simulation]
seed = 7
debug_scan = true

[[obstacles]]
x = 10.0
y = 20.0
width = 15.0
height = 15.0
"#,
        );
        let config = NavConfig::load(file.path()).unwrap();
        assert_eq!(config.localization.error_percentage, 0.0);
        assert_eq!(config.localization.ema_alpha, 0.1);
        assert_eq!(config.human.start, Position::new(40.0, 35.0));
        assert_eq!(config.human.radius, 1.0);
        assert_eq!(config.exploration.mode, KnowledgeMode::Unknown);
        assert_eq!(config.exploration.scan_radius, 12.5);
        assert_eq!(config.exploration.scan_samples, 3);
        assert_eq!(config.simulation.seed, 7);
        assert!(config.simulation.debug_scan);
        assert_eq!(config.obstacles, vec![Rect::new(10.0, 20.0, 15.0, 15.0)]);
    }

    #[test]
    fn test_custom_anchors() {
        let file = write_config(
            r#"
[[anchors]]
name = "north"
position = { x = 0.0, y = 0.0 }

[[anchors]]
name = "east"
position = { x = 50.0, y = 0.0 }

[[anchors]]
name = "south"
position = { x = 50.0, y = 50.0 }
"#,
        );
        let config = NavConfig::load(file.path()).unwrap();
        assert_eq!(config.anchors[1].name, "east");
        assert_eq!(config.anchors[2].position, Position::new(50.0, 50.0));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = NavConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(NavError::Config(_))));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let file = write_config("[arena\nwidth = ");
        assert!(matches!(
            NavConfig::load(file.path()),
            Err(NavError::Config(_))
        ));
    }
}
