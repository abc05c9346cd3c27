pub mod attempts;
pub mod inspect;
pub mod progress;
pub mod schema;
pub mod stats;

use chrono::NaiveDate;
use rusqlite::{Connection, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{AttemptRecord, DailyProgress, MistakeTally};

// Re-export all public items from submodules
pub use attempts::*;
pub use progress::*;
pub use schema::run_migrations;
pub use stats::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Durable record of attempts and the daily aggregate.
///
/// The quiz session only talks to storage through this trait, so tests can
/// hand it a connection with a broken schema to exercise failure paths.
pub trait ProgressStore {
    fn record_attempt(&self, record: &AttemptRecord) -> Result<i64>;
    fn upsert_daily(&self, date: NaiveDate, correct_delta: i64, attempted_delta: i64) -> Result<()>;
    /// Attempt row and daily delta, saved atomically
    fn record_guess(&self, record: &AttemptRecord) -> Result<i64>;
    fn today_progress(&self, date: NaiveDate) -> Result<DailyProgress>;
    fn mistake_tally(&self) -> Result<Vec<MistakeTally>>;
    fn distinct_incorrect_words(&self) -> Result<HashSet<String>>;
    fn reset_all(&self) -> Result<()>;
}

impl ProgressStore for Connection {
    fn record_attempt(&self, record: &AttemptRecord) -> Result<i64> {
        attempts::record_attempt(self, record)
    }

    fn upsert_daily(&self, date: NaiveDate, correct_delta: i64, attempted_delta: i64) -> Result<()> {
        progress::upsert_daily(self, date, correct_delta, attempted_delta)
    }

    fn record_guess(&self, record: &AttemptRecord) -> Result<i64> {
        progress::record_guess(self, record)
    }

    fn today_progress(&self, date: NaiveDate) -> Result<DailyProgress> {
        progress::today_progress(self, date)
    }

    fn mistake_tally(&self) -> Result<Vec<MistakeTally>> {
        attempts::mistake_tally(self)
    }

    fn distinct_incorrect_words(&self) -> Result<HashSet<String>> {
        attempts::distinct_incorrect_words(self)
    }

    fn reset_all(&self) -> Result<()> {
        progress::reset_all(self)
    }
}

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

/// Open (or create) the score database and bring its schema up to date
pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  #[test]
  fn test_init_db_creates_parent_and_backup() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("scores.db");

    let pool = init_db(&path).unwrap();
    {
      let conn = try_lock(&pool).unwrap();
      let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
      conn.record_guess(&AttemptRecord::new(today, "cat", true, 1, "all")).unwrap();
    }
    drop(pool);

    // Second open copies the existing file aside before migrating
    let pool = init_db(&path).unwrap();
    assert!(path.with_extension("db.backup").exists());
    let conn = try_lock(&pool).unwrap();
    assert_eq!(count_attempts(&conn).unwrap(), 1);
  }

  #[test]
  fn test_store_trait_round_trip() {
    let env = TestEnv::new().unwrap();
    let store: &dyn ProgressStore = &env.conn;
    let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

    store.record_guess(&AttemptRecord::new(today, "Gnome", false, 1, "all")).unwrap();
    store.record_guess(&AttemptRecord::new(today, "Gnome", true, 2, "all")).unwrap();

    assert_eq!(store.today_progress(today).unwrap(), DailyProgress::new(1, 2));
    assert_eq!(store.mistake_tally().unwrap().len(), 1);
    assert!(store.distinct_incorrect_words().unwrap().contains("gnome"));

    store.reset_all().unwrap();
    assert!(store.distinct_incorrect_words().unwrap().is_empty());
  }

  #[test]
  fn test_log_warn_default() {
    let failed: std::result::Result<i64, DbLockError> = Err(DbLockError);
    assert_eq!(failed.log_warn_default("count"), 0);
    let ok: std::result::Result<i64, DbLockError> = Ok(3);
    assert_eq!(ok.log_warn("count"), Some(3));
  }
}
