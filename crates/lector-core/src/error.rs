use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Scanner lifecycle errors
    #[error("Could not start camera: {reason}")]
    StartFailure { reason: String },

    #[error("Camera teardown failed: {reason}")]
    TeardownWarning { reason: String },

    // Input errors
    #[error("Empty scan")]
    EmptyScan,

    #[error("Invalid session transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a start failure from any displayable reason.
    pub fn start_failure(reason: impl Into<String>) -> Self {
        Self::StartFailure {
            reason: reason.into(),
        }
    }

    /// Create a teardown warning from any displayable reason.
    pub fn teardown_warning(reason: impl Into<String>) -> Self {
        Self::TeardownWarning {
            reason: reason.into(),
        }
    }

    /// Whether this error must be shown to the operator.
    ///
    /// Only start failures surface; everything else is recovered locally.
    pub fn is_operator_visible(&self) -> bool {
        matches!(self, Self::StartFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
