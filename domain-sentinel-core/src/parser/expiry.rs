//! Expiration date extraction.
//!
//! Registry date formats are wildly inconsistent; parsing is a cascade of
//! cleanup, standard formats and two positional fallback transforms. The
//! first line that yields a parseable date wins and is never overwritten.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap_or_else(|e| unreachable!("{e}")));
static TRAILING_TZ_ABBREV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[A-Z]{2,5}$").unwrap_or_else(|e| unreachable!("{e}")));
static DAY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").unwrap_or_else(|e| unreachable!("{e}")));
static DOTTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})\.(\d{2})\.(\d{2})$").unwrap_or_else(|e| unreachable!("{e}")));

/// Whether a field label announces an expiration date.
///
/// Covers "Registry Expiry Date", "Expiration Time", "Registrar Registration
/// Expiration Date", "paid-till" and friends.
pub(crate) fn is_expiry_label(label: &str) -> bool {
    label.contains("expir") || label.contains("paid-till")
}

/// Parses a raw expiry field value into a UTC datetime.
///
/// Cleanup first (parenthetical text, trailing timezone abbreviations), then
/// standard formats, then the `DD-MM-YYYY` and `YYYY.MM.DD` fallback
/// transforms. Returns `None` when nothing parses.
pub(crate) fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    let cleaned = cleanup(value);
    if cleaned.is_empty() {
        return None;
    }

    parse_standard(&cleaned)
        .or_else(|| parse_day_first(&cleaned))
        .or_else(|| parse_dotted(&cleaned))
}

/// Strips parenthetical text and trailing timezone abbreviations.
///
/// "2025-03-15 00:00:00 (GMT+8:00)" -> "2025-03-15 00:00:00"
/// "14-sep-2026 UTC" -> "14-sep-2026"
fn cleanup(value: &str) -> String {
    let no_parens = PARENTHETICAL.replace_all(value, "");
    let trimmed = no_parens.trim();
    TRAILING_TZ_ABBREV.replace(trimmed, "").trim().to_string()
}

fn parse_standard(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: [&str; 3] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y", "%d %b %Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date_to_utc(date);
        }
    }

    None
}

/// Fallback: `DD-MM-YYYY` reinterpreted as `MM/DD/YYYY`.
fn parse_day_first(value: &str) -> Option<DateTime<Utc>> {
    let caps = DAY_FIRST.captures(value)?;
    let reordered = format!("{}/{}/{}", &caps[2], &caps[1], &caps[3]);
    NaiveDate::parse_from_str(&reordered, "%m/%d/%Y")
        .ok()
        .and_then(date_to_utc)
}

/// Fallback: `YYYY.MM.DD` rewritten as `YYYY-MM-DD`.
fn parse_dotted(value: &str) -> Option<DateTime<Utc>> {
    let caps = DOTTED.captures(value)?;
    let dashed = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&dashed, "%Y-%m-%d")
        .ok()
        .and_then(date_to_utc)
}

fn date_to_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt))
}
