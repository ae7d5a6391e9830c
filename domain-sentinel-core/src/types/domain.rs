//! Domain resolution and storage row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain_sentinel_provider::ProviderId;

/// Classified registration state of a domain.
///
/// Always derived from extracted facts by the classifier, never set by a
/// provider directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    /// Registered, more than 30 days until expiry.
    Normal,
    /// Registered, expires within 30 days (day 0 and day 30 inclusive).
    Expiring,
    /// Expiration date has passed.
    Expired,
    /// No registration found.
    Unregistered,
    /// Resolution produced nothing usable.
    Failed,
}

impl DomainStatus {
    /// Stable string identifier, used in logs and persisted rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
            Self::Unregistered => "unregistered",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's sole output type: one domain's classified resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedDomainInfo {
    /// Normalized (lowercase) domain name.
    pub domain: String,
    /// Sponsoring registrar, when extracted.
    pub registrar: Option<String>,
    /// Expiration date, when extracted and parseable.
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Human-readable status labels, at most 3, comma-joined.
    #[serde(rename = "statusText")]
    pub status_text: Option<String>,
    /// Name servers in discovery order, deduplicated.
    #[serde(rename = "nameServers")]
    pub name_servers: Vec<String>,
    /// DNS provider inferred from the name servers.
    #[serde(rename = "dnsProvider")]
    pub dns_provider: Option<String>,
    /// Classified registration state.
    pub status: DomainStatus,
    /// Which provider produced the underlying data.
    pub source: ProviderId,
    /// Original error message when nothing usable was extracted
    /// (`status == Failed`), surfaced upstream for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A monitored domain as stored by the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Storage ID.
    pub id: String,
    /// Normalized domain name.
    pub name: String,
    /// Sponsoring registrar.
    pub registrar: Option<String>,
    /// Expiration date.
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Inferred DNS provider.
    #[serde(rename = "dnsProvider")]
    pub dns_provider: Option<String>,
    /// Human-readable status labels.
    #[serde(rename = "statusText")]
    pub status_text: Option<String>,
    /// Classified registration state.
    pub status: DomainStatus,
    /// When this domain was last resolved (success or failure).
    #[serde(rename = "lastCheck")]
    pub last_check: Option<DateTime<Utc>>,
}

/// Partial update written back after each resolution.
///
/// `None` fields are left untouched by the storage collaborator;
/// `last_check` is always written so staleness is never hidden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainUpdate {
    pub registrar: Option<String>,
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "dnsProvider")]
    pub dns_provider: Option<String>,
    #[serde(rename = "statusText")]
    pub status_text: Option<String>,
    pub status: Option<DomainStatus>,
    #[serde(rename = "lastCheck")]
    pub last_check: DateTime<Utc>,
}

impl DomainUpdate {
    /// Update carrying a full resolution result.
    #[must_use]
    pub fn from_resolution(info: &ResolvedDomainInfo, now: DateTime<Utc>) -> Self {
        Self {
            registrar: info.registrar.clone(),
            expires_at: info.expires_at,
            dns_provider: info.dns_provider.clone(),
            status_text: info.status_text.clone(),
            status: Some(info.status),
            last_check: now,
        }
    }

    /// Update for a resolution that failed outright: only the failure status
    /// and the check timestamp change.
    #[must_use]
    pub fn check_failed(now: DateTime<Utc>) -> Self {
        Self {
            status: Some(DomainStatus::Failed),
            last_check: now,
            ..Self::default()
        }
    }
}
