//! Slot storage for eshotel
//!
//! Everything eshotel persists is a JSON blob under a named slot. The
//! SQLite [`Database`] is the durable backend, [`MemorySlots`] backs tests,
//! and [`slots`] holds the typed load/save rules for each slot.

mod memory;
mod migrations;
pub mod slots;
mod traits;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::instrument;

use crate::error::Result;

pub use memory::MemorySlots;
pub use traits::SlotStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }
}

impl SlotStore for Database {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_set_get_remove() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get("a").unwrap(), None);

        db.set("a", "[1,2]").unwrap();
        assert_eq!(db.get("a").unwrap().as_deref(), Some("[1,2]"));

        db.set("a", "[]").unwrap();
        assert_eq!(db.get("a").unwrap().as_deref(), Some("[]"));

        db.remove("a").unwrap();
        assert_eq!(db.get("a").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_slot_is_ok() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.remove("never-written").is_ok());
    }

    #[test]
    fn test_schema_version() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.schema_version() >= 2);
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eshotel.db");

        {
            let db = Database::open(&path).unwrap();
            db.set("eshotel_hotel_list", "[]").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get("eshotel_hotel_list").unwrap().as_deref(), Some("[]"));
    }
}
