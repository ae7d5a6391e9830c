//! Shared HTTP plumbing for the keyed lookup services.
//!
//! The two HTTP providers only differ in URL layout, auth header and response
//! schema; request execution, logging and retry live here once.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::LookupError;
use crate::util::truncate_for_log;

/// Connect timeout for lookup service calls, in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Total request timeout for lookup service calls, in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upper bound on a single backoff sleep.
const MAX_BACKOFF_MS: u64 = 10_000;

/// Creates the HTTP client used by all lookup services.
pub fn create_http_client() -> Result<Client, LookupError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| LookupError::Unknown {
            provider: "http".to_string(),
            raw_message: format!("Failed to build HTTP client: {e}"),
        })
}

/// HTTP tool function set.
pub struct HttpUtils;

impl HttpUtils {
    /// Performs a request and returns `(status_code, body)`.
    ///
    /// HTTP 429 maps to [`LookupError::RateLimited`] (honoring `Retry-After`),
    /// 502-504 to [`LookupError::NetworkError`]; both are retryable.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), LookupError> {
        log::debug!("[{provider_name}] GET {url_or_action}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                LookupError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response status: {status_code}");

        // Extract Retry-After before consuming the body.
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(LookupError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Upstream server error (HTTP {status_code})");
            return Err(LookupError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {body}"),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response body: {}",
            truncate_for_log(&body)
        );

        Ok((status_code, body))
    }

    /// Parses a JSON response body into `T`.
    pub fn parse_json<T>(body: &str, provider_name: &str) -> Result<T, LookupError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(body).map_err(|e| {
            log::warn!("[{provider_name}] JSON parse failed: {e}");
            log::warn!("[{provider_name}] Raw response: {}", truncate_for_log(body));
            LookupError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Performs a request, retrying transient failures with exponential
    /// backoff.
    ///
    /// Only [`LookupError::is_retryable`] errors are retried; business errors
    /// (bad key, unusable payload) surface immediately. A `RateLimited` error
    /// carrying `retry_after` overrides the backoff (capped at 30s).
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        url_or_action: &str,
        max_retries: u32,
    ) -> Result<(u16, String), LookupError> {
        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use; clone per attempt.
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, provider_name, url_or_action).await;
            };

            match Self::execute_request(req, provider_name, url_or_action).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        provider_name,
                        attempt + 1,
                        max_retries,
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
            provider: provider_name.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Retry delay for a failed attempt.
///
/// `Retry-After` wins when present (capped at 30s), otherwise exponential
/// backoff.
fn retry_delay(error: &LookupError, attempt: u32) -> Duration {
    if let LookupError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// Exponential backoff: 100ms, 200ms, 400ms, ... capped at 10s.
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // keep 1 << attempt in range
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(MAX_BACKOFF_MS))
}
