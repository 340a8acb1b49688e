use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QaRunError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fixture file not found: {0}")]
    FixtureNotFound(PathBuf),

    #[error("Invalid fixture data: {0}")]
    InvalidFixture(String),

    #[error("Unknown project: {0}")]
    UnknownProject(String),

    #[error("No result '{result}' in the history of {project}")]
    UnknownResult { project: String, result: String },

    #[error("No run has been triggered")]
    NoActiveRun,

    #[error("Failed to install signal handler: {0}")]
    SignalHandler(String),

    #[error("Shell completion error: {0}")]
    ShellCompletion(String),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, QaRunError>;
