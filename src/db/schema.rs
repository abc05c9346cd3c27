use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS scores (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      date TEXT NOT NULL,
      word TEXT NOT NULL,
      correctly_spelled INTEGER NOT NULL,
      attempts INTEGER NOT NULL,
      mode TEXT DEFAULT 'exam'
    );

    CREATE TABLE IF NOT EXISTS daily_exam_progress (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      date TEXT NOT NULL UNIQUE,
      correct_count INTEGER NOT NULL DEFAULT 0,
      total_attempted INTEGER NOT NULL DEFAULT 0,
      CHECK (correct_count >= 0 AND correct_count <= total_attempted)
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_scores_date ON scores(date);
    CREATE INDEX IF NOT EXISTS idx_scores_word ON scores(word);
    CREATE INDEX IF NOT EXISTS idx_scores_correct ON scores(correctly_spelled);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: score logs written before modes were tracked
  add_column_if_missing(conn, "scores", "mode", "TEXT DEFAULT 'exam'")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
