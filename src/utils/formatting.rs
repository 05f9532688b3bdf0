//! Formatting utilities used for CLI outputs.

use crate::utils::colors::RESET;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}{}", s, RESET)
}

/// Storage timestamp (RFC 3339) → "YYYY-MM-DD HH:MM" for display.
/// Values that do not parse are shown unchanged.
pub fn short_ts(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn or_dash(v: Option<&str>) -> String {
    match v {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "--".to_string(),
    }
}
