//! Two-period comparison.

use crate::types::{ComparisonResult, DateRange, LogEntry, PerBot};

use super::stats::count_by_bot;

/// Relative change from `previous` to `current`, in percent.
///
/// When `previous` is zero the result is `100` for any growth and `0`
/// otherwise, so a rise from 0 to N always reads +100% while a drop from
/// N to 0 reads -100%.
pub fn percentage_change(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        if current > 0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current as f64 - previous as f64) / previous as f64 * 100.0
    }
}

/// Compare per-bot counts of `current` against `previous`.
///
/// Both windows are evaluated over all of `entries`; they may overlap or be
/// given in either chronological order.
pub fn compare(
    entries: &[LogEntry],
    current: DateRange,
    previous: DateRange,
) -> ComparisonResult {
    let current_period = count_by_bot(entries, current);
    let previous_period = count_by_bot(entries, previous);
    compare_counts(current_period, previous_period)
}

/// Build a [`ComparisonResult`] from precomputed counts.
pub fn compare_counts(current: PerBot<u64>, previous: PerBot<u64>) -> ComparisonResult {
    let diff = PerBot::from_fn(|bot| {
        let cur = current.get(bot).copied().unwrap_or_default();
        let prev = previous.get(bot).copied().unwrap_or_default();
        cur as i64 - prev as i64
    });
    let pct = PerBot::from_fn(|bot| {
        percentage_change(
            current.get(bot).copied().unwrap_or_default(),
            previous.get(bot).copied().unwrap_or_default(),
        )
    });

    ComparisonResult {
        current_period: current,
        previous_period: previous,
        diff,
        percentage_change: pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BotType;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn entry(bot: BotType, d: u32) -> LogEntry {
        LogEntry {
            id: format!("{}-{}", bot, d),
            timestamp: Utc.with_ymd_and_hms(2023, 10, d, 12, 0, 0).unwrap(),
            bot_type: bot,
            path: "/".to_string(),
            raw: String::new(),
        }
    }

    fn days(from: u32, to: u32) -> DateRange {
        DateRange::days(
            NaiveDate::from_ymd_opt(2023, 10, from).unwrap(),
            NaiveDate::from_ymd_opt(2023, 10, to).unwrap(),
        )
    }

    #[test]
    fn test_percentage_change_policy() {
        assert_eq!(percentage_change(0, 0), 0.0);
        assert_eq!(percentage_change(5, 0), 100.0);
        assert_eq!(percentage_change(500, 0), 100.0);
        assert_eq!(percentage_change(5, 10), -50.0);
        assert_eq!(percentage_change(0, 10), -100.0);
        assert_eq!(percentage_change(15, 10), 50.0);
        assert_eq!(percentage_change(10, 10), 0.0);
    }

    #[test]
    fn test_compare_windows() {
        let mut entries = Vec::new();
        // previous: Oct 1-7
        for d in 1..=7 {
            entries.push(entry(BotType::GptBot, d));
        }
        entries.push(entry(BotType::ClaudeBot, 3));
        // current: Oct 8-14
        for d in 8..=10 {
            entries.push(entry(BotType::GptBot, d));
        }
        entries.push(entry(BotType::PerplexityBot, 9));

        let result = compare(&entries, days(8, 14), days(1, 7));

        assert_eq!(result.current_period.gpt_bot, 3);
        assert_eq!(result.previous_period.gpt_bot, 7);
        assert_eq!(result.diff.gpt_bot, -4);
        assert!((result.percentage_change.gpt_bot - (-400.0 / 7.0)).abs() < 1e-9);

        assert_eq!(result.diff.claude_bot, -1);
        assert_eq!(result.percentage_change.claude_bot, -100.0);

        assert_eq!(result.diff.perplexity_bot, 1);
        assert_eq!(result.percentage_change.perplexity_bot, 100.0);

        assert_eq!(result.diff.google_extended, 0);
        assert_eq!(result.percentage_change.google_extended, 0.0);
    }

    #[test]
    fn test_compare_accepts_overlapping_and_reversed_windows() {
        let entries: Vec<LogEntry> = (1..=10).map(|d| entry(BotType::ClaudeBot, d)).collect();

        let overlapping = compare(&entries, days(1, 10), days(5, 10));
        assert_eq!(overlapping.current_period.claude_bot, 10);
        assert_eq!(overlapping.previous_period.claude_bot, 6);

        // "Previous" later than "current" is fine
        let reversed = compare(&entries, days(1, 2), days(3, 10));
        assert_eq!(reversed.current_period.claude_bot, 2);
        assert_eq!(reversed.previous_period.claude_bot, 8);
        assert_eq!(reversed.percentage_change.claude_bot, -75.0);
    }

    #[test]
    fn test_compare_empty() {
        let result = compare(&[], days(1, 7), days(8, 14));
        for bot in BotType::TRACKED {
            assert_eq!(result.current_period.get(bot), Some(&0));
            assert_eq!(result.diff.get(bot), Some(&0));
            assert_eq!(result.percentage_change.get(bot), Some(&0.0));
        }
    }

    #[test]
    fn test_comparison_serializes_every_tracked_key() {
        let result = compare(&[], days(1, 7), days(8, 14));
        let json = serde_json::to_value(&result).unwrap();
        for field in ["currentPeriod", "previousPeriod", "diff", "percentageChange"] {
            let obj = json[field].as_object().unwrap();
            assert_eq!(obj.len(), 4, "{} should have four keys", field);
            assert!(obj.contains_key("Google-Extended"));
        }
    }
}
