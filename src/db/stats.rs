//! Accuracy statistics derived from the score log

use chrono::NaiveDate;
use rusqlite::{params, Connection, Result};
use serde::Serialize;

use super::attempts::format_date;

/// Accuracy for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAccuracy {
    pub date: String,
    pub attempts: i64,
    pub correct: i64,
}

impl DailyAccuracy {
    /// Percentage of correct attempts, rounded to one decimal
    pub fn percent(&self) -> f64 {
        if self.attempts > 0 {
            (self.correct as f64 / self.attempts as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        }
    }
}

/// Per-date accuracy for every date on or after `since`, oldest first
pub fn daily_accuracy(conn: &Connection, since: NaiveDate) -> Result<Vec<DailyAccuracy>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT date, COUNT(*), COALESCE(SUM(correctly_spelled), 0)
    FROM scores
    WHERE date >= ?1
    GROUP BY date
    ORDER BY date ASC
    "#,
    )?;

    let stats = stmt
        .query_map(params![format_date(since)], |row| {
            Ok(DailyAccuracy {
                date: row.get(0)?,
                attempts: row.get(1)?,
                correct: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(stats)
}

/// Whole-log summary used by the inspection tool
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ScoreSummary {
    pub total: i64,
    pub correct: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl ScoreSummary {
    pub fn incorrect(&self) -> i64 {
        self.total - self.correct
    }

    pub fn accuracy(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

pub fn score_summary(conn: &Connection) -> Result<ScoreSummary> {
    conn.query_row(
        r#"
    SELECT COUNT(*), COALESCE(SUM(correctly_spelled), 0), MIN(date), MAX(date)
    FROM scores
    "#,
        [],
        |row| {
            Ok(ScoreSummary {
                total: row.get(0)?,
                correct: row.get(1)?,
                first_date: row.get(2)?,
                last_date: row.get(3)?,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{record_attempt, run_migrations};
    use crate::domain::AttemptRecord;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn attempt(conn: &Connection, d: u32, correct: bool) {
        record_attempt(conn, &AttemptRecord::new(day(d), "word", correct, 1, "all")).unwrap();
    }

    #[test]
    fn test_daily_accuracy_respects_window() {
        let conn = setup();
        attempt(&conn, 1, true);
        attempt(&conn, 10, true);
        attempt(&conn, 10, false);
        attempt(&conn, 10, false);
        attempt(&conn, 12, true);

        let stats = daily_accuracy(&conn, day(5)).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].date, "2026-04-10");
        assert_eq!(stats[0].attempts, 3);
        assert_eq!(stats[0].correct, 1);
        assert_eq!(stats[0].percent(), 33.3);
        assert_eq!(stats[1].percent(), 100.0);
    }

    #[test]
    fn test_summary_of_empty_log() {
        let conn = setup();
        let summary = score_summary(&conn).unwrap();
        assert_eq!(summary, ScoreSummary::default());
        assert_eq!(summary.accuracy(), 0.0);
    }

    #[test]
    fn test_summary_counts_and_range() {
        let conn = setup();
        attempt(&conn, 3, true);
        attempt(&conn, 8, false);
        attempt(&conn, 5, true);
        attempt(&conn, 5, true);

        let summary = score_summary(&conn).unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.incorrect(), 1);
        assert!((summary.accuracy() - 75.0).abs() < f64::EPSILON);
        assert_eq!(summary.first_date.as_deref(), Some("2026-04-03"));
        assert_eq!(summary.last_date.as_deref(), Some("2026-04-08"));
    }
}
