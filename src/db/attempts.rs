//! Score log: one row per submitted guess

use chrono::NaiveDate;
use rusqlite::{params, Connection, Result, Row};
use serde::Serialize;
use std::collections::HashSet;

use crate::domain::{AttemptRecord, MistakeTally};

/// Date format used in the score tables
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Append one attempt to the score log
pub fn record_attempt(conn: &Connection, record: &AttemptRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO scores (date, word, correctly_spelled, attempts, mode) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            format_date(record.date),
            record.word,
            if record.correct { 1 } else { 0 },
            record.attempt_number as i64,
            record.mode,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All-time misspelling counts per word, most missed first
pub fn mistake_tally(conn: &Connection) -> Result<Vec<MistakeTally>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT word, COUNT(*) AS total_incorrect
    FROM scores
    WHERE correctly_spelled = 0
    GROUP BY word
    ORDER BY total_incorrect DESC, word ASC
    "#,
    )?;

    let tally = stmt
        .query_map([], |row| {
            Ok(MistakeTally {
                word: row.get(0)?,
                mistake_count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(tally)
}

/// Words (lowercased) with at least one incorrect attempt
pub fn distinct_incorrect_words(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT word FROM scores WHERE correctly_spelled = 0")?;

    // SQLite's LOWER() only folds ASCII
    let words = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .map(|word| word.map(|w| w.to_lowercase()))
        .collect::<Result<HashSet<_>>>()?;

    Ok(words)
}

/// Incorrect attempts grouped by word, date and attempt number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncorrectEntry {
    pub word: String,
    pub date: String,
    pub attempts: i64,
    pub times_incorrect: i64,
}

/// Misspelling history, newest date first
pub fn incorrect_history(conn: &Connection) -> Result<Vec<IncorrectEntry>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT word, date, attempts, COUNT(*) AS times_incorrect
    FROM scores
    WHERE correctly_spelled = 0
    GROUP BY word, date, attempts
    ORDER BY date DESC, word ASC
    "#,
    )?;

    let entries = stmt
        .query_map([], |row| {
            Ok(IncorrectEntry {
                word: row.get(0)?,
                date: row.get(1)?,
                attempts: row.get(2)?,
                times_incorrect: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(entries)
}

/// A score log row with its database id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAttempt {
    pub id: i64,
    pub record: AttemptRecord,
}

/// Page through the score log, newest first
pub fn list_attempts(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<StoredAttempt>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, date, word, correctly_spelled, attempts, COALESCE(mode, 'exam')
    FROM scores
    ORDER BY date DESC, id DESC
    LIMIT ?1 OFFSET ?2
    "#,
    )?;

    let attempts = stmt
        .query_map(params![limit, offset], row_to_stored_attempt)?
        .collect::<Result<Vec<_>>>()?;

    Ok(attempts)
}

/// Total number of rows in the score log
pub fn count_attempts(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
}

fn row_to_stored_attempt(row: &Row) -> Result<StoredAttempt> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let attempts: i64 = row.get(4)?;

    Ok(StoredAttempt {
        id: row.get(0)?,
        record: AttemptRecord {
            date,
            word: row.get(2)?,
            correct: row.get::<_, i64>(3)? != 0,
            attempt_number: attempts.max(1) as u32,
            mode: row.get(5)?,
        },
    })
}
