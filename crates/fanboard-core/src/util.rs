//! Shared utility functions used across multiple modules.

use chrono::format::{Item, StrftimeItems};

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Current Unix timestamp in milliseconds.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Pattern used when a configured date pattern is not valid `strftime`.
pub const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Local wall-clock time rendered with a `strftime`-style pattern.
pub fn local_display_date(pattern: &str) -> String {
    let now = chrono::Local::now();
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        tracing::warn!("Invalid date pattern {pattern:?}; using {FALLBACK_DATE_FORMAT:?}");
        return now.format(FALLBACK_DATE_FORMAT).to_string();
    }
    now.format(pattern).to_string()
}
