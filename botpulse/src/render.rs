//! Plain-text rendering of query results.

use botpulse_core::analytics::StatsSummary;
use botpulse_core::format::{format_count, format_diff, format_percentage};
use botpulse_core::{BotType, ComparisonResult, DateRange, LogEntry, StatsResult};

const DATE_WIDTH: usize = 12;
const COLUMN_WIDTH: usize = 16;

fn header(first: &str) -> String {
    let mut line = format!("{:<DATE_WIDTH$}", first);
    for bot in BotType::TRACKED {
        line.push_str(&format!("{:>COLUMN_WIDTH$}", bot.as_str()));
    }
    line.push_str(&format!("{:>COLUMN_WIDTH$}", "Total"));
    line
}

fn describe_window(window: &DateRange) -> String {
    format!(
        "{} .. {}",
        window.start.format("%Y-%m-%d %H:%M:%S"),
        window.end.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Daily table plus a totals row.
pub fn stats_table(window: &DateRange, rows: &[StatsResult], summary: &StatsSummary) -> String {
    let mut out = format!("Activity {} (UTC)\n\n", describe_window(window));

    if rows.is_empty() {
        out.push_str("No bot activity in this window.\n");
        return out;
    }

    out.push_str(&header("Date"));
    out.push('\n');
    for row in rows {
        out.push_str(&format!("{:<DATE_WIDTH$}", row.date));
        for bot in BotType::TRACKED {
            out.push_str(&format!(
                "{:>COLUMN_WIDTH$}",
                format_count(row.by_bot.get(bot))
            ));
        }
        out.push_str(&format!("{:>COLUMN_WIDTH$}\n", format_count(row.total)));
    }

    out.push_str(&format!("{:<DATE_WIDTH$}", "Total"));
    for (_, count) in summary.by_bot.iter() {
        out.push_str(&format!("{:>COLUMN_WIDTH$}", format_count(*count)));
    }
    out.push_str(&format!("{:>COLUMN_WIDTH$}\n", format_count(summary.total)));

    if let Some(top) = summary.top_bot {
        out.push_str(&format!(
            "\nMost active: {} across {} day(s)\n",
            top, summary.active_days
        ));
    }
    out
}

/// Per-bot comparison table.
pub fn comparison_table(
    current: &DateRange,
    previous: &DateRange,
    result: &ComparisonResult,
) -> String {
    let mut out = format!(
        "Current:  {}\nPrevious: {}\n\n",
        describe_window(current),
        describe_window(previous)
    );
    out.push_str(&format!(
        "{:<COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}\n",
        "Bot", "Current", "Previous", "Change", "% Change"
    ));

    for bot in BotType::TRACKED {
        let cur = result.current_period.get(bot).copied().unwrap_or_default();
        let prev = result.previous_period.get(bot).copied().unwrap_or_default();
        let diff = result.diff.get(bot).copied().unwrap_or_default();
        let pct = result
            .percentage_change
            .get(bot)
            .copied()
            .unwrap_or_default();
        out.push_str(&format!(
            "{:<COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}\n",
            bot.as_str(),
            format_count(cur),
            format_count(prev),
            format_diff(diff),
            format_percentage(pct)
        ));
    }
    out
}

/// One line per entry: timestamp, bot, path.
pub fn entry_list(entries: &[&LogEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{}  {:<16} {}\n",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.bot_type.as_str(),
            entry.path
        ));
    }
    out
}
