//! Single-line access log parser
//!
//! Recognizes CLF-like lines such as
//!
//! ```text
//! 1.2.3.4 - - [10/Oct/2023:13:55:36 +0000] "GET /docs HTTP/1.1" 200 512 "-" "Mozilla/5.0 (compatible; GPTBot/1.2)"
//! ```
//!
//! Each step is a separate function so it can be tested on its own:
//! [`extract_timestamp`] → [`extract_request`] → [`parse_timestamp`] → [`classify`].
//! Only the bracketed timestamp and a tracked bot token are mandatory.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::types::{BotType, LogEntry};

/// Path recorded when the quoted request line cannot be matched.
pub const UNKNOWN_PATH: &str = "unknown";

// [DD/Mon/YYYY:HH:MM:SS +HHMM], ASCII classes only
static RE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9]{2}/[A-Za-z0-9_]{3}/[0-9]{4}:[0-9]{2}:[0-9]{2}:[0-9]{2} [+-][0-9]{4})\]")
        .unwrap()
});

// "METHOD /path HTTP
static RE_REQUEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([A-Za-z0-9_]+) ([^ ]+) HTTP"#).unwrap());

/// Method and path from the quoted request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: &'a str,
    pub path: &'a str,
}

/// Why a line did not produce an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Empty or whitespace-only
    Blank,
    /// No bracketed `[DD/Mon/YYYY:HH:MM:SS ±HHMM]` timestamp
    MissingTimestamp,
    /// Timestamp present but not a real date (e.g. unknown month)
    InvalidTimestamp,
    /// No tracked bot token in the line
    UntrackedAgent,
}

/// Returns the text inside the timestamp brackets.
pub fn extract_timestamp(line: &str) -> Option<&str> {
    RE_TIMESTAMP
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Returns the method and path of the first quoted `"METHOD /path HTTP` request.
pub fn extract_request(line: &str) -> Option<Request<'_>> {
    let caps = RE_REQUEST.captures(line)?;
    Some(Request {
        method: caps.get(1)?.as_str(),
        path: caps.get(2)?.as_str(),
    })
}

/// Converts `10/Oct/2023:13:55:36 +0000` into a UTC instant.
///
/// The colon between date and time becomes a space before parsing; colons
/// inside the time are left alone.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.replacen(':', " ", 1);
    DateTime::parse_from_str(&normalized, "%d/%b/%Y %H:%M:%S %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First tracked bot whose token appears in the line (case-sensitive).
pub fn classify(line: &str) -> BotType {
    BotType::TRACKED
        .into_iter()
        .find(|bot| bot.signature().is_some_and(|token| line.contains(token)))
        .unwrap_or(BotType::Other)
}

/// Parse one line, reporting why it was rejected.
pub fn parse_line_detailed(line: &str) -> Result<LogEntry, Rejection> {
    if line.trim().is_empty() {
        return Err(Rejection::Blank);
    }

    let raw_ts = extract_timestamp(line).ok_or(Rejection::MissingTimestamp)?;
    let path = extract_request(line)
        .map(|req| req.path)
        .unwrap_or(UNKNOWN_PATH);

    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
        tracing::trace!(timestamp = raw_ts, "Unparseable timestamp, dropping line");
        Rejection::InvalidTimestamp
    })?;

    let bot_type = classify(line);
    if !bot_type.is_tracked() {
        return Err(Rejection::UntrackedAgent);
    }

    Ok(LogEntry {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp,
        bot_type,
        path: path.to_string(),
        raw: line.to_string(),
    })
}

/// Parse one line into an entry, or `None` if it is blank, undated, or not
/// from a tracked bot.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    parse_line_detailed(line).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const GPT_LINE: &str = r#"66.249.66.1 - - [10/Oct/2023:13:55:36 +0000] "GET /blog/post-1 HTTP/1.1" 200 5120 "-" "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko; compatible; GPTBot/1.0; +https://openai.com/gptbot)""#;

    #[test]
    fn test_extract_timestamp() {
        assert_eq!(
            extract_timestamp(GPT_LINE),
            Some("10/Oct/2023:13:55:36 +0000")
        );
        assert_eq!(extract_timestamp("no date here GPTBot"), None);
        // Missing offset
        assert_eq!(extract_timestamp("[10/Oct/2023:13:55:36] GPTBot"), None);
    }

    #[test]
    fn test_non_ascii_digits_do_not_match() {
        let line = r#"[١٠/Oct/2023:13:55:36 +0000] x [10/Oct/2023:13:55:36 +0000] "GET /a HTTP/1.1" GPTBot"#;
        assert_eq!(
            extract_timestamp(line),
            Some("10/Oct/2023:13:55:36 +0000")
        );

        let entry = parse_line_detailed(line).unwrap();
        assert_eq!(entry.path, "/a");
        assert_eq!(
            entry.timestamp,
            Utc.with_ymd_and_hms(2023, 10, 10, 13, 55, 36).unwrap()
        );

        assert_eq!(
            parse_line_detailed("[١٠/Oct/2023:13:55:36 +0000] GPTBot").unwrap_err(),
            Rejection::MissingTimestamp
        );
    }

    #[test]
    fn test_extract_request() {
        let req = extract_request(GPT_LINE).unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/blog/post-1");

        assert_eq!(extract_request(r#""-" 400 0"#), None);
    }

    #[test]
    fn test_parse_timestamp_applies_offset() {
        let ts = parse_timestamp("10/Oct/2023:13:55:36 -0700").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 10, 10, 20, 55, 36).unwrap());

        let ts = parse_timestamp("10/Oct/2023:23:30:00 +0200").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 10, 10, 21, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_only_replaces_first_colon() {
        // If every colon were replaced the time would not parse at all.
        let ts = parse_timestamp("01/Jan/2024:00:00:01 +0000").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_invalid_dates() {
        assert_eq!(parse_timestamp("10/Foo/2023:13:55:36 +0000"), None);
        assert_eq!(parse_timestamp("31/Feb/2023:13:55:36 +0000"), None);
        assert_eq!(parse_timestamp("10/Oct/2023:25:55:36 +0000"), None);
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(classify("ClaudeBot/1.0"), BotType::ClaudeBot);
        assert_eq!(classify("Google-Extended"), BotType::GoogleExtended);
        assert_eq!(classify("PerplexityBot/1.0"), BotType::PerplexityBot);
        // GPTBot wins when several tokens appear
        assert_eq!(classify("PerplexityBot ClaudeBot GPTBot"), BotType::GptBot);
        assert_eq!(classify("ClaudeBot PerplexityBot"), BotType::ClaudeBot);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(classify("gptbot/1.0"), BotType::Other);
        assert_eq!(classify("Googlebot/2.1"), BotType::Other);
        assert_eq!(classify("Google Extended"), BotType::Other);
    }

    #[test]
    fn test_parse_line_builds_entry() {
        let entry = parse_line(GPT_LINE).unwrap();
        assert_eq!(entry.bot_type, BotType::GptBot);
        assert_eq!(entry.path, "/blog/post-1");
        assert_eq!(entry.raw, GPT_LINE);
        assert_eq!(
            entry.timestamp,
            Utc.with_ymd_and_hms(2023, 10, 10, 13, 55, 36).unwrap()
        );
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_parse_line_ids_are_unique() {
        let a = parse_line(GPT_LINE).unwrap();
        let b = parse_line(GPT_LINE).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_parse_line_without_request_uses_unknown_path() {
        let line = r#"1.2.3.4 - - [10/Oct/2023:13:55:36 +0000] "-" 400 0 "-" "ClaudeBot/1.0""#;
        let entry = parse_line(line).unwrap();
        assert_eq!(entry.path, UNKNOWN_PATH);
        assert_eq!(entry.bot_type, BotType::ClaudeBot);
    }

    #[test]
    fn test_parse_line_rejections() {
        assert_eq!(parse_line_detailed(""), Err(Rejection::Blank));
        assert_eq!(parse_line_detailed("   \t "), Err(Rejection::Blank));
        assert_eq!(
            parse_line_detailed(r#"1.2.3.4 "GET / HTTP/1.1" GPTBot"#),
            Err(Rejection::MissingTimestamp)
        );
        assert_eq!(
            parse_line_detailed(r#"[10/Foo/2023:13:55:36 +0000] "GET / HTTP/1.1" GPTBot"#),
            Err(Rejection::InvalidTimestamp)
        );
        assert_eq!(
            parse_line_detailed(
                r#"[10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1 "-" "Bingbot/2.0""#
            ),
            Err(Rejection::UntrackedAgent)
        );
    }

    #[test]
    fn test_parse_line_tolerates_carriage_return() {
        let line = format!("{}\r", GPT_LINE);
        let entry = parse_line(&line).unwrap();
        assert_eq!(entry.bot_type, BotType::GptBot);
    }
}
