use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ProviderId, RawQueryResult};

/// Uniform contract over one registration-data lookup source.
///
/// Implementations perform network I/O only and keep no shared mutable state
/// between invocations; the orchestrator owns ordering, fallback and rate
/// pacing.
#[async_trait]
pub trait LookupProvider: Send + Sync {
    /// Provider identifier.
    fn id(&self) -> ProviderId;

    /// Whether this provider can currently be used.
    ///
    /// HTTP services report `false` when no API key is configured; the
    /// orchestrator skips disabled providers without counting a failure.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Minimum delay the caller must honor after every call to this
    /// provider, regardless of outcome.
    fn min_delay(&self) -> Duration {
        Duration::ZERO
    }

    /// Query registration data for `domain`.
    ///
    /// Network, timeout and parse failures are returned as values, never
    /// panics; the caller decides whether to fall back.
    async fn query(&self, domain: &str) -> Result<RawQueryResult>;
}
