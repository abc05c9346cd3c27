//! Read-only access for the score inspection tool

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
  #[error("only read-only statements are allowed")]
  NotReadOnly,
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),
}

/// Open an existing score database without write access
pub fn open_read_only(path: &Path) -> rusqlite::Result<Connection> {
  Connection::open_with_flags(
    path,
    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
  )
}

/// Column names plus rows rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult {
  pub columns: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

impl QueryResult {
  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }
}

/// Run an ad-hoc statement, refusing anything that could write
pub fn run_query(conn: &Connection, sql: &str) -> Result<QueryResult, QueryError> {
  let mut stmt = conn.prepare(sql)?;
  if !stmt.readonly() {
    return Err(QueryError::NotReadOnly);
  }

  let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
  let column_count = columns.len();

  let mut rows = stmt.query([])?;
  let mut out = Vec::new();
  while let Some(row) = rows.next()? {
    let mut values = Vec::with_capacity(column_count);
    for i in 0..column_count {
      values.push(render_value(row.get_ref(i)?));
    }
    out.push(values);
  }

  Ok(QueryResult { columns, rows: out })
}

fn render_value(value: ValueRef<'_>) -> String {
  match value {
    ValueRef::Null => "NULL".to_string(),
    ValueRef::Integer(i) => i.to_string(),
    ValueRef::Real(f) => f.to_string(),
    ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
    ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::run_migrations;

  fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
      .execute_batch(
        r#"
        INSERT INTO scores (date, word, correctly_spelled, attempts, mode)
        VALUES ('2026-01-15', 'rhythm', 0, 1, 'all'),
               ('2026-01-15', 'gnome', 1, 2, NULL);
        "#,
      )
      .unwrap();
    conn
  }

  #[test]
  fn test_select_renders_all_value_kinds() {
    let conn = setup();
    let result = run_query(&conn, "SELECT word, attempts, mode, 0.5 AS half FROM scores ORDER BY id").unwrap();

    assert_eq!(result.columns, vec!["word", "attempts", "mode", "half"]);
    assert_eq!(result.rows[0], vec!["rhythm", "1", "all", "0.5"]);
    assert_eq!(result.rows[1][2], "NULL");
  }

  #[test]
  fn test_writes_are_refused() {
    let conn = setup();
    let err = run_query(&conn, "DELETE FROM scores").unwrap_err();
    assert!(matches!(err, QueryError::NotReadOnly));

    let remaining: i64 = conn
      .query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
      .unwrap();
    assert_eq!(remaining, 2);
  }

  #[test]
  fn test_bad_sql_is_an_error() {
    let conn = setup();
    assert!(matches!(
      run_query(&conn, "SELEKT nothing"),
      Err(QueryError::Sqlite(_))
    ));
  }

  #[test]
  fn test_empty_result() {
    let conn = setup();
    let result = run_query(&conn, "SELECT * FROM scores WHERE word = 'absent'").unwrap();
    assert!(result.is_empty());
    assert_eq!(result.columns.len(), 6);
  }

  #[test]
  fn test_open_read_only_rejects_writes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("scores.db");
    {
      let conn = Connection::open(&path).unwrap();
      run_migrations(&conn).unwrap();
    }

    let conn = open_read_only(&path).unwrap();
    assert!(conn.execute("DELETE FROM scores", []).is_err());
  }
}
