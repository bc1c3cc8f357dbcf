//! # botpulse-core
//!
//! Core library for botpulse - an AI crawler traffic analyzer for web-server
//! access logs.
//!
//! This library provides:
//! - Domain types for classified log entries and aggregate results
//! - A line parser that recognizes four AI crawlers in CLF-like access logs
//! - A bounded log store with oldest-first eviction, persisted in SQLite
//! - Daily statistics and two-period comparison
//! - Configuration management and logging infrastructure
//!
//! ## Data flow
//!
//! ```text
//! raw text ──► ingest::parse_bulk ──► LogStore::save ──► get_stats / compare_periods
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use botpulse_core::{Config, Database, DateRange, LogStore};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&config.store.resolved_database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let mut store = LogStore::initialize(db, &config.store);
//! let entries = botpulse_core::ingest::parse_bulk(
//!     r#"1.2.3.4 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 12 "-" "GPTBot/1.0""#,
//! );
//! store.save(entries).expect("failed to save entries");
//!
//! let window = DateRange::last_days(7);
//! for row in store.get_stats(window.start, window.end) {
//!     println!("{} {}", row.date, row.total);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use store::{LogStore, SaveSummary};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod ingest;
pub mod insight;
pub mod logging;
pub mod store;
pub mod types;
