//! Error types for environment setup.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SetupError>;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Command execution failed: {0}")]
    CommandExecution(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
