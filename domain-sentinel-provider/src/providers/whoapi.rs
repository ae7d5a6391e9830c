//! WhoAPI HTTP lookup service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{LookupError, Result};
use crate::http_client::HttpUtils;
use crate::traits::LookupProvider;
use crate::types::{HttpServiceSettings, ProviderId, RawPayload, RawQueryResult, WhoisFields};

pub(crate) const WHOAPI_API_BASE: &str = "https://api.whoapi.com/";
/// Retries for transient failures within one logical query.
const MAX_RETRIES: u32 = 2;

/// WhoAPI `r=whois` response, deserialized loosely.
///
/// `status` is WhoAPI's own result code ("0" means success), not a domain
/// status; domain status tokens arrive in `domain_status`.
#[derive(Debug, Deserialize)]
struct WhoApiResponse {
    status: Option<String>,
    status_desc: Option<String>,
    registered: Option<bool>,
    date_expires: Option<String>,
    #[serde(default)]
    domain_status: Vec<String>,
    #[serde(default)]
    nameservers: Vec<String>,
    #[serde(rename = "whois_registrar")]
    registrar: Option<String>,
}

/// WhoAPI lookup client.
///
/// Disabled automatically when no API key is configured. Carries a fixed
/// minimum inter-request delay the caller honors after every call.
pub struct WhoApiProvider {
    client: Client,
    api_key: Option<String>,
    min_delay: Duration,
}

impl WhoApiProvider {
    pub fn new(client: Client, settings: &HttpServiceSettings) -> Self {
        Self {
            client,
            api_key: settings
                .api_key
                .as_ref()
                .filter(|k| !k.trim().is_empty())
                .cloned(),
            min_delay: Duration::from_millis(settings.min_delay_ms),
        }
    }
}

#[async_trait]
impl LookupProvider for WhoApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WhoApi
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn min_delay(&self) -> Duration {
        self.min_delay
    }

    async fn query(&self, domain: &str) -> Result<RawQueryResult> {
        let api_key = self.api_key.as_ref().ok_or_else(|| LookupError::Unavailable {
            provider: ProviderId::WhoApi.as_str().to_string(),
            reason: "no API key configured".to_string(),
        })?;

        let url = format!("{WHOAPI_API_BASE}?domain={domain}&r=whois&apikey={api_key}");
        let request = self.client.get(&url);

        let (status_code, body) = HttpUtils::execute_request_with_retry(
            request,
            "whoapi",
            &format!("{WHOAPI_API_BASE}?domain={domain}&r=whois"),
            MAX_RETRIES,
        )
        .await?;

        if status_code >= 400 {
            return Err(LookupError::Unknown {
                provider: ProviderId::WhoApi.as_str().to_string(),
                raw_message: format!("HTTP {status_code}: {body}"),
            });
        }

        let resp: WhoApiResponse = HttpUtils::parse_json(&body, "whoapi")?;

        // WhoAPI reports errors in-band with a non-zero status code.
        if let Some(code) = resp.status.as_deref() {
            if code != "0" {
                let desc = resp
                    .status_desc
                    .unwrap_or_else(|| format!("service error code {code}"));
                return Err(LookupError::Unknown {
                    provider: ProviderId::WhoApi.as_str().to_string(),
                    raw_message: desc,
                });
            }
        }

        Ok(RawQueryResult {
            source: ProviderId::WhoApi,
            payload: RawPayload::Fields(WhoisFields {
                registrar: resp.registrar,
                expires_at: resp.date_expires,
                statuses: resp.domain_status,
                name_servers: resp.nameservers,
                registered: resp.registered,
            }),
        })
    }
}
