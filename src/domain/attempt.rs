use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One submitted guess, as stored in the score log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
  pub date: NaiveDate,
  pub word: String,
  pub correct: bool,
  /// Tries on this word within the current presentation, starting at 1
  pub attempt_number: u32,
  /// Pool label the guess was made in ("all", "group-3", "incorrect")
  pub mode: String,
}

impl AttemptRecord {
  pub fn new(date: NaiveDate, word: &str, correct: bool, attempt_number: u32, mode: &str) -> Self {
    Self {
      date,
      word: word.to_string(),
      correct,
      attempt_number: attempt_number.max(1),
      mode: mode.to_string(),
    }
  }
}

/// Per-date aggregate of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DailyProgress {
  pub correct_count: i64,
  pub total_attempted: i64,
}

impl DailyProgress {
  pub fn new(correct_count: i64, total_attempted: i64) -> Self {
    Self {
      correct_count,
      total_attempted,
    }
  }

  /// Progress toward the daily goal, capped at 100
  pub fn goal_percentage(&self, daily_goal: u32) -> u32 {
    if daily_goal == 0 {
      return 100;
    }
    let pct = (self.correct_count.max(0) as f64 / daily_goal as f64 * 100.0).round() as u32;
    pct.min(100)
  }

  pub fn goal_reached(&self, daily_goal: u32) -> bool {
    self.correct_count >= daily_goal as i64
  }
}

/// How many times a word has been misspelled, all time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MistakeTally {
  pub word: String,
  pub mistake_count: i64,
}
