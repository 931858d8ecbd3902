//! Error types for the simulation harness.

use starwalk_core::WalkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The session rejected an operation
    #[error("Session error: {0}")]
    Walk(#[from] WalkError),

    /// Export file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
