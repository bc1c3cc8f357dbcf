//! Ingestion layer for web-server access logs
//!
//! Turns raw text into classified [`LogEntry`] values ready for the store.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  raw text /  │ ──► │  parse_bulk  │ ──► │   LogStore   │
//! │  log file    │     │  (per line)  │     │    ::save    │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                    ┌──────────────────┐
//!                    │ line::parse_line │
//!                    └──────────────────┘
//! ```
//!
//! Lines that are blank, undated, or not from a tracked bot are dropped
//! silently. That is a filtering policy, not an error: an import with no
//! recognized lines yields an empty vector.

pub mod line;

pub use line::{parse_line, Rejection};

use crate::error::Result;
use crate::types::LogEntry;
use std::path::Path;

/// Outcome of a bulk parse.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Candidate lines seen (including blank ones)
    pub lines_read: usize,
    /// Lines with no content
    pub blank: usize,
    /// Lines without a bracketed timestamp
    pub missing_timestamp: usize,
    /// Lines whose timestamp was present but not a valid date
    pub invalid_timestamp: usize,
    /// Lines not from a tracked bot
    pub untracked: usize,
}

impl ImportReport {
    /// Lines that did not produce an entry
    pub fn rejected(&self) -> usize {
        self.blank + self.missing_timestamp + self.invalid_timestamp + self.untracked
    }

    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Blank => self.blank += 1,
            Rejection::MissingTimestamp => self.missing_timestamp += 1,
            Rejection::InvalidTimestamp => self.invalid_timestamp += 1,
            Rejection::UntrackedAgent => self.untracked += 1,
        }
    }
}

/// Parse every line of `content`, keeping entries in input order.
pub fn parse_bulk(content: &str) -> Vec<LogEntry> {
    content.split('\n').filter_map(parse_line).collect()
}

/// Like [`parse_bulk`], but also counts why lines were dropped.
pub fn parse_bulk_with_report(content: &str) -> (Vec<LogEntry>, ImportReport) {
    let mut report = ImportReport::default();
    let mut entries = Vec::new();

    for candidate in content.split('\n') {
        report.lines_read += 1;
        match line::parse_line_detailed(candidate) {
            Ok(entry) => entries.push(entry),
            Err(rejection) => report.record(rejection),
        }
    }

    tracing::debug!(
        lines = report.lines_read,
        accepted = entries.len(),
        rejected = report.rejected(),
        "Parsed access log content"
    );

    (entries, report)
}

/// Read a log file and parse it.
///
/// Invalid UTF-8 is replaced rather than rejected, so binary content simply
/// produces unmatched lines.
pub fn parse_file(path: &Path) -> Result<(Vec<LogEntry>, ImportReport)> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Parsing access log file");
    Ok(parse_bulk_with_report(&content))
}
