//! Error types for DishaNav

use disha_map::{ArenaError, LocalizationError};
use thiserror::Error;

/// DishaNav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Localization error: {0}")]
    Localization(#[from] LocalizationError),

    #[error("Arena error: {0}")]
    Arena(#[from] ArenaError),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
