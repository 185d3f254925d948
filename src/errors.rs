// src/errors.rs

//! Crate-wide error type.
//!
//! Every variant is terminal: `main` prints its `Display` text as a single
//! bold status line and exits with status 1.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("No '{0}' found")]
    ConfigNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Task \"{0}\" not found")]
    TaskNotFound(String),

    /// A parenthesized group nested below a top-level task.
    #[error("Subtask descriptions and execution control not supported")]
    UnsupportedNesting { task: String },

    #[error("[run] Command '{code}' has failed")]
    CommandFailed { code: String, status: i32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RunError>;
