//! Port-43 WHOIS protocol client.

use async_trait::async_trait;
use whois_rust::{WhoIs, WhoIsLookupOptions};

use crate::error::{LookupError, Result};
use crate::http_client::backoff_delay;
use crate::traits::LookupProvider;
use crate::types::{ProviderId, RawPayload, RawQueryResult, WhoisSettings};

/// Embedded TLD-to-server map, keeps the client usable without external files.
const WHOIS_SERVERS: &str = include_str!("whois_servers.json");

/// WHOIS protocol client with an internal bounded retry policy.
///
/// Transient failures (connection resets, registry timeouts) are retried
/// `retry_attempts` times with exponential backoff before surfacing; the
/// orchestrator then decides whether to fall back to an HTTP service.
pub struct WhoisProvider {
    client: WhoIs,
    enabled: bool,
    retry_attempts: u32,
}

impl WhoisProvider {
    /// Builds the client from its embedded server map.
    pub fn new(settings: &WhoisSettings) -> Result<Self> {
        let client = WhoIs::from_string(WHOIS_SERVERS).map_err(|e| LookupError::Unknown {
            provider: ProviderId::Whois.as_str().to_string(),
            raw_message: format!("Failed to initialize WHOIS client: {e}"),
        })?;

        Ok(Self {
            client,
            enabled: settings.enabled,
            retry_attempts: settings.retry_attempts,
        })
    }

    async fn lookup_once(&self, domain: &str) -> Result<String> {
        let options =
            WhoIsLookupOptions::from_string(domain).map_err(|e| LookupError::Unavailable {
                provider: ProviderId::Whois.as_str().to_string(),
                reason: format!("Domain not accepted by WHOIS client: {e}"),
            })?;

        self.client
            .lookup_async(options)
            .await
            .map_err(|e| LookupError::NetworkError {
                provider: ProviderId::Whois.as_str().to_string(),
                detail: format!("WHOIS query failed: {e}"),
            })
    }
}

#[async_trait]
impl LookupProvider for WhoisProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Whois
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn query(&self, domain: &str) -> Result<RawQueryResult> {
        let mut last_error = None;

        for attempt in 0..=self.retry_attempts {
            match self.lookup_once(domain).await {
                Ok(raw) if raw.trim().is_empty() => {
                    // Some registries answer an empty body under load; treat
                    // it as transient.
                    last_error = Some(LookupError::ParseError {
                        provider: ProviderId::Whois.as_str().to_string(),
                        detail: "Empty WHOIS response".to_string(),
                    });
                }
                Ok(raw) => {
                    return Ok(RawQueryResult {
                        source: ProviderId::Whois,
                        payload: RawPayload::Text(raw),
                    });
                }
                Err(e) if attempt < self.retry_attempts && e.is_retryable() => {
                    let delay = backoff_delay(attempt);
                    log::warn!(
                        "[whois] Lookup for {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        domain,
                        attempt + 1,
                        self.retry_attempts,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LookupError::NetworkError {
            provider: ProviderId::Whois.as_str().to_string(),
            detail: "WHOIS retries exhausted".to_string(),
        }))
    }
}
