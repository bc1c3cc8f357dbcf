//! Core domain types for botpulse
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Bot type** | One of a closed set of AI crawler identities, inferred from the user agent |
//! | **Tracked bot** | A bot type other than [`BotType::Other`]; only these are ever stored |
//! | **Entry** | One access-log line that was classified as a tracked bot |
//! | **Window** | An inclusive `[start, end]` range of UTC instants ([`DateRange`]) |
//! | **Eviction** | Dropping the oldest entries once the store exceeds its capacity |
//!
//! Serialized names follow the original dashboard's JSON layout (camelCase
//! fields, `"Google-Extended"` for [`BotType::GoogleExtended`]) so an exported
//! entry blob stays readable by other tools.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Bot Types
// ============================================

/// AI crawler identities recognized in access logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BotType {
    /// OpenAI's crawler
    #[serde(rename = "GPTBot")]
    GptBot,
    /// Anthropic's crawler
    #[serde(rename = "ClaudeBot")]
    ClaudeBot,
    /// Google's AI training token
    #[serde(rename = "Google-Extended")]
    GoogleExtended,
    /// Perplexity's crawler
    #[serde(rename = "PerplexityBot")]
    PerplexityBot,
    /// Anything else; never stored
    #[serde(rename = "Other")]
    Other,
}

impl BotType {
    /// The tracked bots, in classification priority order.
    pub const TRACKED: [BotType; 4] = [
        BotType::GptBot,
        BotType::ClaudeBot,
        BotType::GoogleExtended,
        BotType::PerplexityBot,
    ];

    /// Every bot type, including the [`BotType::Other`] sentinel.
    pub const ALL: [BotType; 5] = [
        BotType::GptBot,
        BotType::ClaudeBot,
        BotType::GoogleExtended,
        BotType::PerplexityBot,
        BotType::Other,
    ];

    /// Returns the display name (also the serialized name)
    pub fn as_str(&self) -> &'static str {
        match self {
            BotType::GptBot => "GPTBot",
            BotType::ClaudeBot => "ClaudeBot",
            BotType::GoogleExtended => "Google-Extended",
            BotType::PerplexityBot => "PerplexityBot",
            BotType::Other => "Other",
        }
    }

    /// Case-sensitive user-agent token that identifies this bot in a log line.
    pub fn signature(&self) -> Option<&'static str> {
        match self {
            BotType::Other => None,
            bot => Some(bot.as_str()),
        }
    }

    /// Whether entries of this type are kept by the store.
    pub fn is_tracked(&self) -> bool {
        !matches!(self, BotType::Other)
    }
}

impl std::fmt::Display for BotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BotType::ALL
            .into_iter()
            .find(|bot| bot.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown bot type: {}", s))
    }
}

// ============================================
// Log Entries
// ============================================

/// One classified access-log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Opaque identifier generated at parse time
    pub id: String,
    /// When the request happened (the line's offset applied, stored as UTC)
    pub timestamp: DateTime<Utc>,
    /// Which tracked bot made the request
    pub bot_type: BotType,
    /// Requested path, or `"unknown"` if the request line did not match
    pub path: String,
    /// Original line, verbatim
    pub raw: String,
}

// ============================================
// Per-bot maps
// ============================================

/// One value for each tracked bot.
///
/// Every key is a field, so a map can never be missing a bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerBot<T> {
    #[serde(rename = "GPTBot")]
    pub gpt_bot: T,
    #[serde(rename = "ClaudeBot")]
    pub claude_bot: T,
    #[serde(rename = "Google-Extended")]
    pub google_extended: T,
    #[serde(rename = "PerplexityBot")]
    pub perplexity_bot: T,
}

impl<T> PerBot<T> {
    /// Build a map by calling `f` once per tracked bot, in priority order.
    pub fn from_fn(mut f: impl FnMut(BotType) -> T) -> Self {
        Self {
            gpt_bot: f(BotType::GptBot),
            claude_bot: f(BotType::ClaudeBot),
            google_extended: f(BotType::GoogleExtended),
            perplexity_bot: f(BotType::PerplexityBot),
        }
    }

    /// Value for `bot`; `None` for [`BotType::Other`].
    pub fn get(&self, bot: BotType) -> Option<&T> {
        match bot {
            BotType::GptBot => Some(&self.gpt_bot),
            BotType::ClaudeBot => Some(&self.claude_bot),
            BotType::GoogleExtended => Some(&self.google_extended),
            BotType::PerplexityBot => Some(&self.perplexity_bot),
            BotType::Other => None,
        }
    }

    pub fn get_mut(&mut self, bot: BotType) -> Option<&mut T> {
        match bot {
            BotType::GptBot => Some(&mut self.gpt_bot),
            BotType::ClaudeBot => Some(&mut self.claude_bot),
            BotType::GoogleExtended => Some(&mut self.google_extended),
            BotType::PerplexityBot => Some(&mut self.perplexity_bot),
            BotType::Other => None,
        }
    }

    /// Iterate `(bot, value)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (BotType, &T)> + '_ {
        BotType::TRACKED
            .into_iter()
            .filter_map(move |bot| self.get(bot).map(|value| (bot, value)))
    }
}

/// Entry counts with a slot for every [`BotType`], `Other` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BotCounts {
    #[serde(flatten)]
    pub tracked: PerBot<u64>,
    #[serde(rename = "Other")]
    pub other: u64,
}

impl BotCounts {
    pub fn increment(&mut self, bot: BotType) {
        match self.tracked.get_mut(bot) {
            Some(count) => *count += 1,
            None => self.other += 1,
        }
    }

    pub fn get(&self, bot: BotType) -> u64 {
        self.tracked.get(bot).copied().unwrap_or(self.other)
    }

    /// Sum over every bot type.
    pub fn total(&self) -> u64 {
        BotType::ALL.iter().map(|bot| self.get(*bot)).sum()
    }
}

// ============================================
// Query results
// ============================================

/// Entry counts for one calendar date (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    /// `YYYY-MM-DD`
    pub date: String,
    pub by_bot: BotCounts,
    /// Sum of `by_bot`
    pub total: u64,
}

/// Two windows compared bot by bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub current_period: PerBot<u64>,
    pub previous_period: PerBot<u64>,
    /// `current - previous`
    pub diff: PerBot<i64>,
    /// Relative change in percent; see [`crate::analytics::percentage_change`]
    pub percentage_change: PerBot<f64>,
}

// ============================================
// Date ranges
// ============================================

/// Inclusive window of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whole calendar days: `from` at 00:00:00 through `to` at 23:59:59 UTC.
    pub fn days(from: NaiveDate, to: NaiveDate) -> Self {
        let start = Utc.from_utc_datetime(&from.and_time(NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&to.and_time(NaiveTime::MIN)) + Duration::seconds(86_399);
        Self { start, end }
    }

    /// The `days` days before today plus today itself.
    pub fn last_days(days: i64) -> Self {
        let today = Utc::now().date_naive();
        Self::days(today - Duration::days(days), today)
    }

    /// Inclusive on both ends.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}
