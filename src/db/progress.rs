//! Daily aggregate of attempts and bulk reset

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::attempts::{format_date, record_attempt};
use crate::domain::{AttemptRecord, DailyProgress};

/// Add deltas to the row for `date`, creating it on first use.
///
/// A single INSERT .. ON CONFLICT statement, so concurrent writers cannot
/// lose updates. The table's CHECK constraint rejects a delta pair that
/// would push correct_count above total_attempted.
pub fn upsert_daily(
    conn: &Connection,
    date: NaiveDate,
    correct_delta: i64,
    attempted_delta: i64,
) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO daily_exam_progress (date, correct_count, total_attempted)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(date) DO UPDATE SET
        correct_count = correct_count + excluded.correct_count,
        total_attempted = total_attempted + excluded.total_attempted
    "#,
        params![format_date(date), correct_delta, attempted_delta],
    )?;
    Ok(())
}

/// Log a guess and bump the daily aggregate in one transaction
pub fn record_guess(conn: &Connection, record: &AttemptRecord) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let id = record_attempt(&tx, record)?;
    upsert_daily(&tx, record.date, if record.correct { 1 } else { 0 }, 1)?;
    tx.commit()?;
    Ok(id)
}

/// Progress for a date; (0, 0) when nothing was attempted
pub fn today_progress(conn: &Connection, date: NaiveDate) -> Result<DailyProgress> {
    let progress = conn
        .query_row(
            "SELECT correct_count, total_attempted FROM daily_exam_progress WHERE date = ?1",
            params![format_date(date)],
            |row| Ok(DailyProgress::new(row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(progress.unwrap_or_default())
}

/// Delete every attempt and daily aggregate. Irreversible.
pub fn reset_all(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM scores", [])?;
    tx.execute("DELETE FROM daily_exam_progress", [])?;
    tx.commit()?;
    tracing::info!("All scores and daily progress deleted");
    Ok(())
}
