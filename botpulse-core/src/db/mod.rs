//! Database layer for botpulse
//!
//! The log store persists its whole entry sequence as one serialized blob,
//! so the database is a small key/value table with:
//! - Schema migrations
//! - Get/put/delete of text values by key

pub mod repo;
pub mod schema;

pub use repo::Database;
