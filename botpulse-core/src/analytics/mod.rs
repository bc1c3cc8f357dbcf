//! Analytics module for botpulse
//!
//! Pure aggregation over entry slices:
//! - Daily statistics per bot ([`daily_stats`])
//! - Per-bot totals for a window ([`count_by_bot`]) and across rows ([`summarize`])
//! - Two-period comparison with absolute and relative deltas ([`compare`])
//!
//! [`crate::store::LogStore`] answers its queries with these functions; they
//! are public so callers holding entries elsewhere can reuse them.

pub mod comparison;
pub mod stats;

pub use comparison::{compare, compare_counts, percentage_change};
pub use stats::{count_by_bot, daily_stats, date_key, summarize, StatsSummary};
