//! Database repository layer
//!
//! Key/value access to the `kv_store` table.

use crate::error::{Error, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// On-disk location, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Size of the database file in bytes (0 for in-memory databases)
    pub fn size_bytes(&self) -> u64 {
        self.path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0)
    }

    // ============================================
    // Key/value operations
    // ============================================

    /// Get the value stored under `key`
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(Error::from)
    }

    /// Insert or replace the value stored under `key`
    pub fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Delete the value stored under `key`. Returns whether a row was removed.
    pub fn delete_value(&self, key: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute("DELETE FROM kv_store WHERE key = ?", [key])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn test_missing_key_is_none() {
        let db = test_db();
        assert_eq!(db.get_value("log_entries").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let db = test_db();
        db.put_value("k", "one").unwrap();
        db.put_value("k", "two").unwrap();
        assert_eq!(db.get_value("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let db = test_db();
        db.put_value("k", "v").unwrap();
        assert!(db.delete_value("k").unwrap());
        assert!(!db.delete_value("k").unwrap());
        assert_eq!(db.get_value("k").unwrap(), None);
    }

    #[test]
    fn test_unmigrated_database_errors() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_value("k"), Err(Error::Database(_))));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data.db");
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        db.put_value("k", "v").unwrap();

        assert_eq!(db.path(), Some(path.as_path()));
        assert!(path.exists());
        assert!(db.size_bytes() > 0);
    }

    #[test]
    fn test_in_memory_size_is_zero() {
        assert_eq!(test_db().size_bytes(), 0);
    }
}
