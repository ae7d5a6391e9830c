//! Status token cleanup and registration-state classification.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::types::DomainStatus;

/// Most labels kept after cleanup.
const MAX_STATUS_LABELS: usize = 3;
/// Unknown tokens are kept verbatim but bounded.
const MAX_UNKNOWN_LEN: usize = 24;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").unwrap_or_else(|e| unreachable!("{e}")));
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap_or_else(|e| unreachable!("{e}")));

/// Phrases that mark a domain as unregistered in raw WHOIS text.
///
/// Matched against the lowercased full response; registries phrase absence
/// a dozen different ways.
const UNREGISTERED_PHRASES: [&str; 10] = [
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "no object found",
    "object does not exist",
    "domain not found",
    "status: available",
    "status: free",
    "is free",
];

/// EPP-style status keyword table, evaluated in order; the first matching
/// row wins per token. Longer/more specific keywords come first so that
/// e.g. `inactive` is not swallowed by `active`.
const STATUS_KEYWORDS: [(&str, &str); 15] = [
    ("clientdeleteprohibited", "Delete Protected"),
    ("serverdeleteprohibited", "Delete Locked"),
    ("clienttransferprohibited", "Transfer Protected"),
    ("servertransferprohibited", "Transfer Locked"),
    ("clientupdateprohibited", "Update Protected"),
    ("serverupdateprohibited", "Update Locked"),
    ("clienthold", "On Hold"),
    ("serverhold", "Suspended"),
    ("redemptionperiod", "Redemption Period"),
    ("pendingdelete", "Pending Delete"),
    ("pendingtransfer", "Pending Transfer"),
    ("inactive", "Inactive"),
    ("active", "Active"),
    ("registered", "Registered"),
    ("ok", "Normal"),
];

/// Whether a field label announces a status token.
///
/// DNSSEC lines also carry "status"-ish wording and are excluded by the
/// caller via [`is_dnssec_line`].
pub(crate) fn is_status_label(label: &str) -> bool {
    label.contains("status") || label == "state"
}

/// Whether a raw line concerns DNSSEC rather than registration status.
pub(crate) fn is_dnssec_line(line_lowercase: &str) -> bool {
    line_lowercase.contains("dnssec")
}

/// Whether the raw response declares the domain unregistered.
pub(crate) fn detect_unregistered(raw_lowercase: &str) -> bool {
    UNREGISTERED_PHRASES
        .iter()
        .any(|phrase| raw_lowercase.contains(phrase))
}

/// Cleans raw status tokens into at most [`MAX_STATUS_LABELS`] short labels.
///
/// Per token: strip URLs, parenthetical text and a literal `Domain Status:`
/// prefix, then map through the keyword table; unmapped tokens are truncated
/// and kept verbatim. Deduplicated, order-preserving, and idempotent:
/// cleaning an already-cleaned set yields the same set.
pub(crate) fn clean_status_tokens(raw_tokens: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    for token in raw_tokens {
        let stripped = strip_token(token);
        if stripped.is_empty() {
            continue;
        }

        let label = map_token(&stripped);
        if !labels.contains(&label) {
            labels.push(label);
        }
        if labels.len() == MAX_STATUS_LABELS {
            break;
        }
    }

    labels
}

/// Joins cleaned labels for display, `None` when nothing survived cleanup.
pub(crate) fn join_status_labels(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        Some(labels.join(", "))
    }
}

fn strip_token(token: &str) -> String {
    let no_url = URL.replace_all(token, "");
    let no_parens = PARENTHETICAL.replace_all(&no_url, "");
    let mut cleaned = no_parens.trim();
    // Some registries repeat the field label inside the value.
    if let Some(rest) = strip_prefix_ci(cleaned, "domain status:") {
        cleaned = rest.trim();
    }
    cleaned.to_string()
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn map_token(token: &str) -> String {
    let lowered = token.to_lowercase();
    for (keyword, label) in STATUS_KEYWORDS {
        // Short keywords ("ok") match exactly, longer ones by containment.
        let matched = lowered == keyword || (keyword.len() > 4 && lowered.contains(keyword));
        if matched {
            return label.to_string();
        }
    }
    token.chars().take(MAX_UNKNOWN_LEN).collect()
}

/// Pure classification of a domain's registration state.
///
/// Evaluation order is fixed: unregistered detection wins outright; an
/// extracted expiration date always classifies by days remaining, even when
/// registrar/status are missing (dates are the more reliable upstream
/// signal); only then does a completely empty extraction count as failed.
pub(crate) fn classify(
    unregistered: bool,
    expires_at: Option<DateTime<Utc>>,
    has_registrar_or_status: bool,
    now: DateTime<Utc>,
) -> DomainStatus {
    if unregistered {
        return DomainStatus::Unregistered;
    }

    if let Some(expiry) = expires_at {
        let days = days_remaining(expiry, now);
        return if days > 30 {
            DomainStatus::Normal
        } else if days >= 0 {
            DomainStatus::Expiring
        } else {
            DomainStatus::Expired
        };
    }

    if !has_registrar_or_status {
        return DomainStatus::Failed;
    }

    // Partial data (registrar or status but no date) is not clearly failed.
    DomainStatus::Normal
}

/// Days until expiry, ceiling division (a fraction of a day counts as one).
pub(crate) fn days_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const DAY_SECS: i64 = 86_400;
    let secs = expiry.signed_duration_since(now).num_seconds();
    (secs + DAY_SECS - 1).div_euclid(DAY_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    // ==================== clean_status_tokens ====================

    #[test]
    fn epp_token_with_url_mapped() {
        let raw = vec![
            "clientTransferProhibited https://icann.org/epp#clientTransferProhibited".to_string(),
        ];
        assert_eq!(clean_status_tokens(&raw), vec!["Transfer Protected"]);
    }

    #[test]
    fn ok_maps_to_normal_exactly() {
        assert_eq!(clean_status_tokens(&["ok".to_string()]), vec!["Normal"]);
        // "ok" must not substring-match inside unrelated tokens
        assert_eq!(clean_status_tokens(&["broken".to_string()]), vec!["broken"]);
    }

    #[test]
    fn inactive_not_swallowed_by_active() {
        assert_eq!(clean_status_tokens(&["inactive".to_string()]), vec!["Inactive"]);
        assert_eq!(clean_status_tokens(&["active".to_string()]), vec!["Active"]);
    }

    #[test]
    fn embedded_label_prefix_stripped() {
        let raw = vec!["Domain Status: clientHold".to_string()];
        assert_eq!(clean_status_tokens(&raw), vec!["On Hold"]);
    }

    #[test]
    fn unknown_token_truncated_and_kept() {
        let raw = vec!["someVeryLongUnrecognizedRegistryStatusToken".to_string()];
        let labels = clean_status_tokens(&raw);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].chars().count(), 24);
        assert!(labels[0].starts_with("someVeryLong"));
    }

    #[test]
    fn dedup_and_cap_at_three() {
        let raw = vec![
            "clientTransferProhibited".to_string(),
            "clientTransferProhibited https://icann.org".to_string(),
            "clientDeleteProhibited".to_string(),
            "clientUpdateProhibited".to_string(),
            "serverHold".to_string(),
        ];
        let labels = clean_status_tokens(&raw);
        assert_eq!(
            labels,
            vec!["Transfer Protected", "Delete Protected", "Update Protected"]
        );
    }

    #[test]
    fn cleanup_is_idempotent() {
        let raw = vec![
            "clientTransferProhibited https://icann.org".to_string(),
            "ok".to_string(),
            "REGISTERED, DELEGATED".to_string(),
        ];
        let once = clean_status_tokens(&raw);
        let twice = clean_status_tokens(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_tokens_dropped() {
        let raw = vec!["https://icann.org/epp".to_string(), "  ".to_string()];
        assert!(clean_status_tokens(&raw).is_empty());
        assert_eq!(join_status_labels(&[]), None);
    }

    // ==================== detect_unregistered ====================

    #[test]
    fn no_match_phrase_detected() {
        assert!(detect_unregistered("no match for domain \"example-free.com\""));
        assert!(detect_unregistered("the queried object does not exist"));
        assert!(detect_unregistered("status: free"));
    }

    #[test]
    fn registered_response_not_flagged() {
        assert!(!detect_unregistered(
            "domain name: example.com\nregistrar: example inc."
        ));
    }

    // ==================== classify ====================

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn unregistered_wins_over_everything() {
        let status = classify(true, Some(now() + Duration::days(365)), true, now());
        assert_eq!(status, DomainStatus::Unregistered);
    }

    #[test]
    fn day_boundaries() {
        let now = now();
        let at = |days: i64| Some(now + Duration::days(days));
        assert_eq!(classify(false, at(31), true, now), DomainStatus::Normal);
        assert_eq!(classify(false, at(30), true, now), DomainStatus::Expiring);
        assert_eq!(classify(false, at(0), true, now), DomainStatus::Expiring);
        assert_eq!(classify(false, at(-1), true, now), DomainStatus::Expired);
    }

    #[test]
    fn fractional_day_rounds_up() {
        let now = now();
        let expiry = now + Duration::hours(12);
        assert_eq!(days_remaining(expiry, now), 1);
        let expiry = now + Duration::days(30) + Duration::hours(12);
        assert_eq!(days_remaining(expiry, now), 31);
    }

    #[test]
    fn date_presence_beats_missing_registrar() {
        // Observed upstream precedence: a date classifies even when nothing
        // else was extracted.
        let now = now();
        let status = classify(false, Some(now + Duration::days(100)), false, now);
        assert_eq!(status, DomainStatus::Normal);
    }

    #[test]
    fn nothing_extracted_is_failed() {
        assert_eq!(classify(false, None, false, now()), DomainStatus::Failed);
    }

    #[test]
    fn partial_data_is_normal() {
        assert_eq!(classify(false, None, true, now()), DomainStatus::Normal);
    }
}
