//! Public types shared by lookup providers and their callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a lookup source.
///
/// The set is closed on purpose: the orchestrator computes per-domain
/// provider orderings from these variants and relies on exhaustive matching
/// instead of a string-keyed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Port-43 WHOIS protocol (the standard registration-data source).
    Whois,
    /// WhoisJSON HTTP lookup service.
    WhoisJson,
    /// WhoAPI HTTP lookup service.
    WhoApi,
}

impl ProviderId {
    /// All providers in their declared (default-priority) order.
    pub const ALL: [Self; 3] = [Self::Whois, Self::WhoisJson, Self::WhoApi];

    /// Stable string identifier, used in logs and persisted results.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Whois => "whois",
            Self::WhoisJson => "whoisjson",
            Self::WhoApi => "whoapi",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whois" => Ok(Self::Whois),
            "whoisjson" => Ok(Self::WhoisJson),
            "whoapi" => Ok(Self::WhoApi),
            _ => Err(format!("Unknown provider: {s}")),
        }
    }
}

/// Registration fields already parsed by an HTTP lookup service.
///
/// Dates and status tokens are kept as raw strings; the caller's parser owns
/// normalization so that all sources go through one cleanup path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhoisFields {
    /// Sponsoring registrar name.
    pub registrar: Option<String>,
    /// Expiration date as reported by the service (unparsed).
    pub expires_at: Option<String>,
    /// Raw status tokens.
    pub statuses: Vec<String>,
    /// Name servers in discovery order.
    pub name_servers: Vec<String>,
    /// Whether the service reports the domain as registered.
    ///
    /// `None` when the service does not carry the field; the caller then
    /// falls back to phrase detection.
    pub registered: Option<bool>,
}

/// Payload of a successful lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum RawPayload {
    /// Raw multi-line WHOIS text, to be parsed line by line.
    Text(String),
    /// Structured fields from a JSON service (bypasses text parsing).
    Fields(WhoisFields),
}

/// Result of a single provider query, before parsing/classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQueryResult {
    /// Which provider produced the payload.
    pub source: ProviderId,
    /// The raw payload.
    pub payload: RawPayload,
}

/// Configuration for one keyed HTTP lookup service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServiceSettings {
    /// API key. The provider is disabled when absent or empty.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Minimum delay honored by the caller after every call, in milliseconds.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
}

impl Default for HttpServiceSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            min_delay_ms: default_min_delay_ms(),
        }
    }
}

fn default_min_delay_ms() -> u64 {
    1000
}

/// Configuration for the WHOIS protocol client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoisSettings {
    /// Whether the WHOIS client participates in lookups.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Bounded retry attempts for transient WHOIS failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

impl Default for WhoisSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            retry_attempts: default_retry_attempts(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_retry_attempts() -> u32 {
    2
}

/// Configuration for all lookup providers, read once at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// WHOIS protocol client settings.
    #[serde(default)]
    pub whois: WhoisSettings,
    /// WhoisJSON service settings.
    #[serde(default)]
    pub whoisjson: HttpServiceSettings,
    /// WhoAPI service settings.
    #[serde(default)]
    pub whoapi: HttpServiceSettings,
}
