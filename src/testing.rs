//! Test utilities for database and word list setup.
//!
//! Reuses the authoritative schema initialization so tests never carry
//! their own copy of the table definitions.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Score database plus scratch space in one temporary directory,
/// cleaned up when dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// scores.db connection with the full schema
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("scores.db"))?;
        crate::db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a CSV word list into the temp directory
    pub fn write_words(&self, csv: &str) -> PathBuf {
        let path = self.path().join("words.csv");
        std::fs::write(&path, csv).expect("write test word list");
        path
    }
}
