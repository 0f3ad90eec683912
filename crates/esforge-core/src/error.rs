//! Error types for esforge.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unreadable schema document. Fatal for the whole run.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Malformed generation config. Callers recover by falling back to defaults.
    #[error("Config error: {0}")]
    Config(String),

    /// Artifacts of a synthesized variant disagree with each other.
    #[error("Contract violation: {0}")]
    Contract(String),

    #[error("Task error: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
