use serde::{Deserialize, Serialize};

/// Unified error type for all lookup provider operations.
///
/// Each variant carries a `provider` field identifying which lookup source
/// produced the error. All variants are serializable for structured error
/// reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on
/// retry:
/// - [`NetworkError`](Self::NetworkError) — connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — upstream rate limit exceeded
///
/// The built-in HTTP plumbing automatically retries these with exponential
/// backoff; the orchestrator treats everything except [`Unavailable`](Self::Unavailable)
/// as a fallback trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum LookupError {
    /// A network-level error occurred (connection refused, DNS failure, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The upstream rate limit was exceeded (HTTP 429 or equivalent).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if supplied.
        retry_after: Option<u64>,
        /// Original error message from the service, if available.
        raw_message: Option<String>,
    },

    /// The provider is disabled or missing a credential.
    ///
    /// The orchestrator skips unavailable providers instead of counting them
    /// as failures.
    Unavailable {
        /// Provider that produced the error.
        provider: String,
        /// Why the provider cannot be used.
        reason: String,
    },

    /// The provider returned data that could not be understood.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// An unrecognized error from the lookup service.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error message from the service.
        raw_message: String,
    },
}

impl LookupError {
    /// Whether this error represents expected behavior (disabled provider,
    /// malformed upstream data) rather than an operational fault.
    ///
    /// Returns `true` for `warn`-level logging, `false` for `error`-level.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::ParseError { .. } | Self::RateLimited { .. }
        )
    }

    /// Whether the failure is transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// The identifier of the provider that produced this error.
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Unavailable { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Unavailable { provider, reason } => {
                write!(f, "[{provider}] Provider unavailable: {reason}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Convenience type alias for `Result<T, LookupError>`.
pub type Result<T> = std::result::Result<T, LookupError>;
