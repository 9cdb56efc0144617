//! Local persistence for seen-state.
//!
//! A single `SQLite` file under the storage root holds one row per
//! `(tour, user)` pair that has been started at least once:
//!
//! ```text
//! <root>/seen.sqlite
//!   seen(tour_id, user_id, seen_at)
//! ```
//!
//! Rows are only ever inserted. Absence means "not seen".

use std::{fs, io, path::PathBuf};

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension};

use crate::seen::SeenStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS seen (
    tour_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    seen_at TEXT NOT NULL,
    PRIMARY KEY (tour_id, user_id)
)";

/// `SQLite`-backed seen-state store.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the store under the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let conn = Connection::open(root.join("seen.sqlite"))?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Returns the default storage root: `~/.tourguide/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tourguide"))
    }

    /// Records that `user_id` has started `tour_id`.
    ///
    /// Idempotent: the first timestamp is kept.
    pub fn mark_seen(&self, tour_id: &str, user_id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO seen (tour_id, user_id, seen_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (tour_id, user_id) DO NOTHING",
            rusqlite::params![tour_id, user_id, Timestamp::now().to_string()],
        )?;
        Ok(())
    }

    /// When `user_id` first started `tour_id`, if ever.
    pub fn seen_at(&self, tour_id: &str, user_id: &str) -> Result<Option<Timestamp>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT seen_at FROM seen WHERE tour_id = ?1 AND user_id = ?2",
                rusqlite::params![tour_id, user_id],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|s| {
            s.parse::<Timestamp>()
                .map_err(|e| StorageError::Corrupt(format!("invalid seen_at: {e}")))
        })
        .transpose()
    }

    pub fn has_seen(&self, tour_id: &str, user_id: &str) -> Result<bool> {
        let seen: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM seen WHERE tour_id = ?1 AND user_id = ?2)",
            rusqlite::params![tour_id, user_id],
            |row| row.get(0),
        )?;
        Ok(seen)
    }
}

impl SeenStore for Storage {
    fn get(&self, tour_id: &str, user_id: &str) -> Result<bool> {
        self.has_seen(tour_id, user_id)
    }

    fn set(&self, tour_id: &str, user_id: &str) -> Result<()> {
        self.mark_seen(tour_id, user_id)
    }

    fn seen_at(&self, tour_id: &str, user_id: &str) -> Result<Option<Timestamp>> {
        Storage::seen_at(self, tour_id, user_id)
    }
}
