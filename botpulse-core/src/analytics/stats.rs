//! Time-bucketed statistics.
//!
//! Entries are grouped by the UTC calendar date of their timestamp. Dates
//! without entries in the window produce no row.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{BotCounts, BotType, DateRange, LogEntry, PerBot, StatsResult};

/// `YYYY-MM-DD` key for a timestamp (UTC).
pub fn date_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// One row per date with entries in `range`, sorted by date ascending.
pub fn daily_stats(entries: &[LogEntry], range: DateRange) -> Vec<StatsResult> {
    // BTreeMap keeps the ISO date keys in lexical (= chronological) order.
    let mut grouped: BTreeMap<String, BotCounts> = BTreeMap::new();

    for entry in entries.iter().filter(|e| range.contains(e.timestamp)) {
        grouped
            .entry(date_key(entry.timestamp))
            .or_default()
            .increment(entry.bot_type);
    }

    grouped
        .into_iter()
        .map(|(date, by_bot)| StatsResult {
            date,
            total: by_bot.total(),
            by_bot,
        })
        .collect()
}

/// Per-bot entry counts within `range`.
pub fn count_by_bot(entries: &[LogEntry], range: DateRange) -> PerBot<u64> {
    let mut counts = BotCounts::default();
    for entry in entries.iter().filter(|e| range.contains(e.timestamp)) {
        counts.increment(entry.bot_type);
    }
    counts.tracked
}

/// Totals across a set of stats rows (the dashboard header figures).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Number of rows (dates with activity)
    pub active_days: usize,
    pub by_bot: PerBot<u64>,
    pub total: u64,
    /// Bot with the most entries; ties go to the higher-priority bot
    pub top_bot: Option<BotType>,
}

/// Sum per-bot counts over `rows`.
pub fn summarize(rows: &[StatsResult]) -> StatsSummary {
    let by_bot: PerBot<u64> =
        PerBot::from_fn(|bot| rows.iter().map(|row| row.by_bot.get(bot)).sum());
    let total: u64 = rows.iter().map(|row| row.total).sum();

    let mut top_bot = None;
    let mut top_count = 0;
    for (bot, count) in by_bot.iter() {
        if *count > top_count {
            top_bot = Some(bot);
            top_count = *count;
        }
    }

    StatsSummary {
        active_days: rows.len(),
        by_bot,
        total,
        top_bot,
    }
}
