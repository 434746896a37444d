//! Small text and time helpers shared by config, remote, and reporting code.

use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone, Utc};

const COMPACT_TEXT_LIMIT: usize = 180;

/// Trimmed text, or `None` when nothing is left.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub fn is_http_url(value: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.trim_start().starts_with(scheme))
}

/// Shorten a server message so it fits on one log or error line.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(COMPACT_TEXT_LIMIT).collect()
}

/// Start of the local calendar day containing `now`, expressed in UTC.
///
/// Falls back to `now` itself if local midnight does not exist (DST gaps).
pub fn local_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let local_now = now.with_timezone(&Local);
    let midnight = local_now.date_naive().and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(start) | LocalResult::Ambiguous(start, _) => start.with_timezone(&Utc),
        LocalResult::None => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_normalizes_to_none() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some(" \t ".to_string())), None);
        assert_eq!(
            normalize_text_option(Some("  Milk 1L ".to_string())),
            Some("Milk 1L".to_string())
        );
    }

    #[test]
    fn only_web_schemes_count_as_urls() {
        assert!(is_http_url("http://127.0.0.1:54321"));
        assert!(is_http_url("https://abc.supabase.co"));
        assert!(!is_http_url("postgres://abc.supabase.co"));
        assert!(!is_http_url("abc.supabase.co"));
    }

    #[test]
    fn compact_text_caps_length() {
        let long = "x".repeat(COMPACT_TEXT_LIMIT * 2);
        assert_eq!(compact_text(&long).len(), COMPACT_TEXT_LIMIT);
    }

    #[test]
    fn local_day_start_is_not_after_now() {
        let now = Utc::now();
        let start = local_day_start(now);
        assert!(start <= now);
        assert!(now - start < chrono::Duration::hours(25));
    }
}
