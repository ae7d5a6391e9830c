//! Small shared helpers.

/// Maximum number of bytes included in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Truncates a response body for logging.
///
/// WHOIS payloads routinely run to several kilobytes; logs keep the first
/// `TRUNCATE_LIMIT` bytes (respecting char boundaries) plus the total size.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut cut = TRUNCATE_LIMIT;
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}
