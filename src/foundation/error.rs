/// Convenience result type used across Pneuma.
pub type PneumaResult<T> = Result<T, PneumaError>;

/// Top-level error taxonomy used by runtime APIs.
///
/// Per-tick numeric paths never produce errors (bad input is clamped or
/// normalized); only constructors and preset loading can fail.
#[derive(thiserror::Error, Debug)]
pub enum PneumaError {
    /// Invalid user-provided configuration or preset data.
    #[error("config error: {0}")]
    Config(String),

    /// The host scheduling environment is unusable.
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PneumaError {
    /// Build a [`PneumaError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PneumaError::Scheduler`] value.
    pub fn scheduler(msg: impl Into<String>) -> Self {
        Self::Scheduler(msg.into())
    }
}
