//! Error types for the Starwalk core.

use thiserror::Error;

/// Errors reported synchronously by the core components.
///
/// None of these are retried internally. Capturing an unknown target and
/// recording a duplicate route point are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalkError {
    /// Non-positive radius, zero count, out-of-range coordinate, etc.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Rejection sampling never produced a point inside the region
    #[error("Sampling exhausted after {attempts} attempts")]
    SamplingExhausted { attempts: u32 },

    /// Operation requires an active session
    #[error("No active session")]
    NotActive,
}

impl WalkError {
    /// Creates an invalid-argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, WalkError>;
