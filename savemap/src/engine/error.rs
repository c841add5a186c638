//! Parsing engine errors.

use thiserror::Error;

use super::GameKind;

/// Errors raised by the parsing engine or its detection module.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// The engine module for a game failed to load.
    #[error("failed to initialize {kind} engine: {message}")]
    Initialization { kind: GameKind, message: String },

    /// The engine refused the save.
    #[error("{0}")]
    Rejected(String),

    /// The engine answered with data the pipeline cannot use.
    #[error("malformed engine output: {0}")]
    Malformed(String),

    /// The worker hosting the engine went away.
    #[error("engine worker unavailable: {0}")]
    WorkerUnavailable(String),
}
