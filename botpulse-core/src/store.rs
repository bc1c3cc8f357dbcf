//! Bounded, persisted collection of classified log entries
//!
//! The store keeps entries in arrival order (oldest first) and caps them at
//! [`StoreConfig::max_entries`]; once the cap is exceeded the oldest entries
//! are evicted. The whole sequence is written to the database as one JSON
//! blob after every mutation and read back once by [`LogStore::initialize`].
//!
//! ## Lifecycle
//!
//! ```rust,ignore
//! let mut store = LogStore::initialize(db, &config.store);
//! store.save(entries)?;
//! let rows = store.get_stats(start, end);
//! let db = store.shutdown();
//! ```

use chrono::{DateTime, Utc};

use crate::analytics;
use crate::config::StoreConfig;
use crate::db::Database;
use crate::error::Result;
use crate::types::{ComparisonResult, DateRange, LogEntry, StatsResult};

/// Database key holding the serialized entry sequence.
pub const ENTRIES_KEY: &str = "log_entries";

/// What a [`LogStore::save`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    /// Entries passed to `save`
    pub appended: usize,
    /// Oldest entries dropped to stay within capacity
    pub evicted: usize,
    /// Entries held after the save
    pub total: usize,
}

/// Append-only entry store with oldest-first eviction.
pub struct LogStore {
    db: Database,
    entries: Vec<LogEntry>,
    max_entries: usize,
}

impl LogStore {
    /// Restore the store from `db`.
    ///
    /// Never fails: unreadable or malformed persisted state is logged and the
    /// store starts empty. A persisted sequence longer than the configured
    /// capacity is trimmed to its newest entries.
    pub fn initialize(db: Database, config: &StoreConfig) -> Self {
        let max_entries = config.max_entries.max(1);
        let mut entries = match load_entries(&db) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load saved logs, starting empty");
                Vec::new()
            }
        };

        if entries.len() > max_entries {
            let excess = entries.len() - max_entries;
            entries.drain(..excess);
            tracing::info!(evicted = excess, max_entries, "Trimmed restored logs to capacity");
        }

        tracing::info!(entries = entries.len(), max_entries, "Log store initialized");

        Self {
            db,
            entries,
            max_entries,
        }
    }

    /// End the store's lifecycle and hand back the database.
    pub fn shutdown(self) -> Database {
        tracing::debug!(entries = self.entries.len(), "Log store shut down");
        self.db
    }

    /// Append `new_entries`, evict the oldest beyond capacity, and persist.
    ///
    /// The in-memory sequence is updated even if persisting fails.
    pub fn save(&mut self, new_entries: Vec<LogEntry>) -> Result<SaveSummary> {
        let appended = new_entries.len();
        self.entries.extend(new_entries);

        let evicted = self.entries.len().saturating_sub(self.max_entries);
        if evicted > 0 {
            self.entries.drain(..evicted);
            tracing::debug!(evicted, max_entries = self.max_entries, "Evicted oldest logs");
        }

        self.persist()?;

        let summary = SaveSummary {
            appended,
            evicted,
            total: self.entries.len(),
        };
        tracing::info!(
            appended = summary.appended,
            evicted = summary.evicted,
            total = summary.total,
            "Saved logs"
        );
        Ok(summary)
    }

    /// Remove every entry, in memory and on disk. Idempotent.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.db.delete_value(ENTRIES_KEY)?;
        tracing::info!("Cleared all logs");
        Ok(())
    }

    /// Every stored entry, oldest first.
    pub fn get_all(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backend holding the persisted entries.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Daily per-bot counts for entries in `[start, end]`, sorted by date.
    pub fn get_stats(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<StatsResult> {
        analytics::daily_stats(&self.entries, DateRange::new(start, end))
    }

    /// Compare `[current_start, current_end]` against `[previous_start, previous_end]`.
    pub fn compare_periods(
        &self,
        current_start: DateTime<Utc>,
        current_end: DateTime<Utc>,
        previous_start: DateTime<Utc>,
        previous_end: DateTime<Utc>,
    ) -> ComparisonResult {
        analytics::compare(
            &self.entries,
            DateRange::new(current_start, current_end),
            DateRange::new(previous_start, previous_end),
        )
    }

    fn persist(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.entries)?;
        self.db.put_value(ENTRIES_KEY, &blob)
    }
}

fn load_entries(db: &Database) -> Result<Vec<LogEntry>> {
    match db.get_value(ENTRIES_KEY)? {
        Some(blob) => Ok(serde_json::from_str(&blob)?),
        None => Ok(Vec::new()),
    }
}
