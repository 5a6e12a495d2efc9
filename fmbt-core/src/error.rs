//! Error types for fmbt test generation.

use thiserror::Error;

/// Main error type for fmbt.
///
/// The search itself never fails: inapplicable transitions, dead ends and
/// exhausted coverage are reported as data. Errors come from configuration,
/// from manually assembled paths and from executing generated steps.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FmbtError {
    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Two adjacent steps of a path do not connect.
    #[error("Broken path at step {index}: previous step ends in {end} but step starts from {start}")]
    BrokenPath {
        index: usize,
        end: String,
        start: String,
    },

    /// Executing a generated step against the system under test failed.
    #[error("Step {step} failed: {reason}")]
    StepFailed { step: String, reason: String },
}

/// Result type for fmbt operations.
pub type Result<T> = std::result::Result<T, FmbtError>;

impl FmbtError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        FmbtError::InvalidConfig {
            message: message.into(),
        }
    }
}
