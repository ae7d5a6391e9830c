//! Unified error type definition.

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use domain_sentinel_provider::LookupError;

/// Core layer error type.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Domain name failed syntax validation; no network call was made.
    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),

    /// Domain not found in the storage collaborator.
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Every provider in the strategy failed or was skipped.
    #[error("All lookup providers failed: {0}")]
    AllProvidersExhausted(String),

    /// Cron expression rejected at task registration time.
    #[error("Invalid schedule '{expression}': {detail}")]
    InvalidSchedule { expression: String, detail: String },

    /// Scheduled task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Storage collaborator error.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Notification collaborator error.
    #[error("Notification error: {0}")]
    NotificationError(String),

    /// Provider error (converted from the lookup library).
    #[error("{0}")]
    Lookup(#[from] LookupError),
}

impl CoreError {
    /// Whether this is expected behavior (user input, disabled providers),
    /// used for log-level selection.
    ///
    /// Level `warn` should be used when returning `true`, `error` otherwise.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidDomain(_)
            | Self::DomainNotFound(_)
            | Self::InvalidSchedule { .. }
            | Self::TaskNotFound(_) => true,
            Self::Lookup(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
