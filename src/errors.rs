use thiserror::Error;
use uuid::Uuid;

/// Error type covering every way a forecast run can fail.
///
/// All variants are deterministic for a given plan snapshot; the engine never
/// retries internally. Callers may retry [`Dependency`] failures under their
/// own policy.
///
/// [`Dependency`]: ForecastError::Dependency
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForecastError {
    /// Malformed plan input (bad horizon ordering, missing manual amount).
    #[error("invalid plan: {0}")]
    Validation(String),
    /// A planned item carries a schedule configuration the engine rejects.
    #[error("item {item} has an invalid schedule: {reason}")]
    Configuration { item: Uuid, reason: String },
    /// Horizon or occurrence growth exceeds the engine's bounds.
    #[error("{0}")]
    LimitExceeded(String),
    /// The referenced plan does not exist.
    #[error("plan {0} not found")]
    NotFound(Uuid),
    /// An external collaborator (balance provider) failed.
    #[error("dependency failure: {0}")]
    Dependency(String),
}

impl ForecastError {
    pub fn configuration(item: Uuid, reason: impl Into<String>) -> Self {
        Self::Configuration {
            item,
            reason: reason.into(),
        }
    }
}
