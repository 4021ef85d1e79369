//! Error types for agenda.

use std::path::PathBuf;

use thiserror::Error;

use crate::event::ValidationError;

/// Errors that can occur in agenda operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Events file {} is malformed at line {line}: {reason}", path.display())]
    CorruptStore {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Could not write events file {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
