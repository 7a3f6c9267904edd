use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandeerError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Composition error: {0}")]
    CompositionError(String),
    #[error("Default command error: {0}")]
    DefaultCommandError(String),
    #[error("Command '{0}' is single-use and has already run")]
    CommandConsumed(String),
    #[error("Command '{0}' was scheduled from inside one of its own callbacks")]
    ReentrantCommand(String),
    #[error("Unknown subsystem: {0}")]
    UnknownSubsystem(String),
}
