//! Raw-response parsing and classification.
//!
//! Turns a provider's payload (raw WHOIS text or pre-parsed JSON fields)
//! into a classified [`ResolvedDomainInfo`]. The WHOIS text format is
//! loosely standardized at best, so extraction is an explicit ordered set of
//! per-line label rules — best-effort heuristics, not a grammar. This
//! function never fails: unusable input classifies as
//! [`DomainStatus::Failed`] with the reason attached.

mod dns;
mod expiry;
mod status;

use chrono::{DateTime, Utc};

use domain_sentinel_provider::{RawPayload, RawQueryResult, WhoisFields};

use crate::types::{DomainStatus, ResolvedDomainInfo};

use dns::infer_dns_provider;
use expiry::{is_expiry_label, parse_expiry};
use status::{
    classify, clean_status_tokens, detect_unregistered, is_dnssec_line, is_status_label,
    join_status_labels,
};

/// Registrar field labels, most common first. Matched exactly (lowercased)
/// rather than by substring so "Registration Service Provider" and
/// "Registrar URL" lines never false-match.
const REGISTRAR_LABELS: [&str; 3] = ["registrar", "registrar name", "sponsoring registrar"];

/// Name-server field labels.
const NAMESERVER_LABELS: [&str; 3] = ["name server", "nserver", "nameserver"];

/// Fields extracted from one raw WHOIS text blob.
#[derive(Debug, Default)]
struct ExtractedFields {
    registrar: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    raw_statuses: Vec<String>,
    name_servers: Vec<String>,
}

/// Parses and classifies one provider payload.
///
/// The sole entry point of this module; `now` is injected so classification
/// stays a pure function of its inputs.
#[must_use]
pub fn resolve_payload(
    domain: &str,
    result: &RawQueryResult,
    now: DateTime<Utc>,
) -> ResolvedDomainInfo {
    match &result.payload {
        RawPayload::Text(raw) => resolve_text(domain, result, raw, now),
        RawPayload::Fields(fields) => resolve_fields(domain, result, fields, now),
    }
}

fn resolve_text(
    domain: &str,
    result: &RawQueryResult,
    raw: &str,
    now: DateTime<Utc>,
) -> ResolvedDomainInfo {
    let extracted = extract_fields(raw);
    let unregistered = detect_unregistered(&raw.to_lowercase());
    assemble(domain, result, extracted, unregistered, now)
}

fn resolve_fields(
    domain: &str,
    result: &RawQueryResult,
    fields: &WhoisFields,
    now: DateTime<Utc>,
) -> ResolvedDomainInfo {
    let extracted = ExtractedFields {
        registrar: fields
            .registrar
            .as_ref()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
        expires_at: fields.expires_at.as_deref().and_then(parse_expiry),
        raw_statuses: fields.statuses.clone(),
        name_servers: dedup_name_servers(fields.name_servers.iter().map(String::as_str)),
    };
    let unregistered = fields.registered == Some(false);
    assemble(domain, result, extracted, unregistered, now)
}

fn assemble(
    domain: &str,
    result: &RawQueryResult,
    extracted: ExtractedFields,
    unregistered: bool,
    now: DateTime<Utc>,
) -> ResolvedDomainInfo {
    let labels = clean_status_tokens(&extracted.raw_statuses);
    let status_text = join_status_labels(&labels);
    let has_registrar_or_status = extracted.registrar.is_some() || status_text.is_some();

    let status = classify(unregistered, extracted.expires_at, has_registrar_or_status, now);
    let error = if status == DomainStatus::Failed {
        Some(format!(
            "No usable registration data in {} response",
            result.source
        ))
    } else {
        None
    };

    if status == DomainStatus::Failed {
        log::warn!("[{}] Resolution of {domain} extracted nothing usable", result.source);
    }

    ResolvedDomainInfo {
        domain: domain.to_string(),
        registrar: extracted.registrar,
        expires_at: extracted.expires_at,
        status_text,
        dns_provider: infer_dns_provider(&extracted.name_servers),
        name_servers: extracted.name_servers,
        status,
        source: result.source,
        error,
    }
}

/// Line-oriented field extraction: each line is split at its first colon and
/// matched against the label rules. First match wins for registrar and
/// expiry; name servers and statuses accumulate.
fn extract_fields(raw: &str) -> ExtractedFields {
    let mut out = ExtractedFields::default();

    for line in raw.lines() {
        let line_lc = line.to_lowercase();
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let label_lc = label.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        if out.registrar.is_none() && REGISTRAR_LABELS.contains(&label_lc.as_str()) {
            out.registrar = Some(value.to_string());
        }

        if NAMESERVER_LABELS.contains(&label_lc.as_str()) {
            push_name_server(&mut out.name_servers, value);
        }

        if is_status_label(&label_lc) && !is_dnssec_line(&line_lc) {
            out.raw_statuses.push(value.to_string());
        }

        if out.expires_at.is_none() && is_expiry_label(&label_lc) {
            // First line that yields a parseable date wins; later expiry
            // lines never overwrite it.
            out.expires_at = parse_expiry(value);
        }
    }

    out
}

fn push_name_server(servers: &mut Vec<String>, value: &str) {
    // "nserver" lines often append an IP after the host.
    let Some(host) = value.split_whitespace().next() else {
        return;
    };
    let host = host.trim_end_matches('.').to_lowercase();
    if !host.is_empty() && !servers.contains(&host) {
        servers.push(host);
    }
}

fn dedup_name_servers<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut servers = Vec::new();
    for value in values {
        push_name_server(&mut servers, value);
    }
    servers
}
