//! WhoisJSON HTTP lookup service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{LookupError, Result};
use crate::http_client::HttpUtils;
use crate::traits::LookupProvider;
use crate::types::{HttpServiceSettings, ProviderId, RawPayload, RawQueryResult, WhoisFields};

pub(crate) const WHOISJSON_API_BASE: &str = "https://whoisjson.com/api/v1/whois";
/// Retries for transient failures within one logical query.
const MAX_RETRIES: u32 = 2;

/// WhoisJSON service response, deserialized loosely.
///
/// The service is not formally versioned; every field is optional so schema
/// drift degrades to missing data instead of a hard parse failure.
#[derive(Debug, Deserialize)]
struct WhoisJsonResponse {
    registered: Option<bool>,
    expires: Option<String>,
    registrar: Option<WhoisJsonRegistrar>,
    #[serde(default)]
    status: Vec<String>,
    #[serde(default)]
    nameserver: Vec<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhoisJsonRegistrar {
    name: Option<String>,
}

/// WhoisJSON lookup client.
///
/// Disabled automatically when no API key is configured. Carries a fixed
/// minimum inter-request delay the caller honors after every call.
pub struct WhoisJsonProvider {
    client: Client,
    api_key: Option<String>,
    min_delay: Duration,
}

impl WhoisJsonProvider {
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
impl LookupProvider for WhoisJsonProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WhoisJson
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn min_delay(&self) -> Duration {
        self.min_delay
    }

    async fn query(&self, domain: &str) -> Result<RawQueryResult> {
        let api_key = self.api_key.as_ref().ok_or_else(|| LookupError::Unavailable {
            provider: ProviderId::WhoisJson.as_str().to_string(),
            reason: "no API key configured".to_string(),
        })?;

        let url = format!("{WHOISJSON_API_BASE}?domain={domain}");
        let request = self
            .client
            .get(&url)
            .header("Authorization", format!("Token={api_key}"));

        let (status_code, body) =
            HttpUtils::execute_request_with_retry(request, "whoisjson", &url, MAX_RETRIES).await?;

        if status_code == 401 || status_code == 403 {
            return Err(LookupError::Unavailable {
                provider: ProviderId::WhoisJson.as_str().to_string(),
                reason: format!("API key rejected (HTTP {status_code})"),
            });
        }
        if status_code >= 400 {
            return Err(LookupError::Unknown {
                provider: ProviderId::WhoisJson.as_str().to_string(),
                raw_message: format!("HTTP {status_code}: {body}"),
            });
        }

        let resp: WhoisJsonResponse = HttpUtils::parse_json(&body, "whoisjson")?;

        if let Some(error) = resp.error {
            return Err(LookupError::Unknown {
                provider: ProviderId::WhoisJson.as_str().to_string(),
                raw_message: error,
            });
        }

        Ok(RawQueryResult {
            source: ProviderId::WhoisJson,
            payload: RawPayload::Fields(WhoisFields {
                registrar: resp.registrar.and_then(|r| r.name),
                expires_at: resp.expires,
                statuses: resp.status,
                name_servers: resp.nameserver,
                registered: resp.registered,
            }),
        })
    }
}
