//! Quiz session state machine.
//!
//! `Idle -> Ready -> Checked -> Ready ...`, and back to `Idle` whenever the
//! pool changes. Words are drawn from a shuffled deck of pool indices; the
//! deck is reshuffled once every word has been presented.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::scoring::spelling_matches;
use crate::catalog::GroupPartitioner;
use crate::db::ProgressStore;
use crate::domain::{AttemptRecord, PoolMode, WordEntry};
use crate::error::DrillError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizState {
  /// No pool chosen
  #[default]
  Idle,
  /// Current word drawn, awaiting a guess
  Ready,
  /// Last guess scored, awaiting advance
  Checked,
}

impl QuizState {
  pub fn as_str(&self) -> &'static str {
    match self {
      QuizState::Idle => "idle",
      QuizState::Ready => "ready",
      QuizState::Checked => "checked",
    }
  }
}

/// Result of one scored guess. The real word is always disclosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptOutcome {
  pub correct: bool,
  pub word: String,
  pub definition: String,
  pub sentence: String,
  pub guess: String,
  pub attempt_number: u32,
}

/// One user's quiz, held in memory between requests
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
  mode: Option<PoolMode>,
  pool: Vec<WordEntry>,
  /// Not-yet-presented pool indices; drawn from the back
  draw_queue: Vec<usize>,
  current: Option<usize>,
  attempts_on_current: u32,
  last_outcome: Option<AttemptOutcome>,
  state: QuizState,
}

impl QuizSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> QuizState {
    self.state
  }

  pub fn mode(&self) -> Option<PoolMode> {
    self.mode
  }

  pub fn pool_len(&self) -> usize {
    self.pool.len()
  }

  /// Words left before the deck is reshuffled
  pub fn remaining_in_queue(&self) -> usize {
    self.draw_queue.len()
  }

  pub fn attempts_on_current(&self) -> u32 {
    self.attempts_on_current
  }

  pub fn last_outcome(&self) -> Option<&AttemptOutcome> {
    self.last_outcome.as_ref()
  }

  /// Switch to a new pool and draw its first word.
  ///
  /// Any previous pool, queue and attempt count are discarded, including
  /// when the new pool cannot be resolved.
  pub fn select_pool<S: ProgressStore + ?Sized>(
    &mut self,
    mode: PoolMode,
    groups: &GroupPartitioner,
    store: &S,
  ) -> Result<&WordEntry, DrillError> {
    self.reset();

    let incorrect_words = match mode {
      PoolMode::Incorrect => store.distinct_incorrect_words()?,
      _ => Default::default(),
    };
    let pool = groups.resolve_pool(mode, &incorrect_words)?;

    tracing::debug!("Selected pool {} with {} words", mode, pool.len());
    self.mode = Some(mode);
    self.pool = pool;
    self.draw_next();
    self.present_current()
  }

  /// The word being quizzed; the UI speaks it and shows its definition
  pub fn present_current(&self) -> Result<&WordEntry, DrillError> {
    match (self.state, self.current) {
      (QuizState::Ready | QuizState::Checked, Some(i)) => Ok(&self.pool[i]),
      _ => Err(self.invalid("present a word")),
    }
  }

  /// Score a guess against the current word.
  ///
  /// The attempt is saved before any in-memory state changes, so a storage
  /// failure leaves the session exactly as it was.
  pub fn submit_guess<S: ProgressStore + ?Sized>(
    &mut self,
    guess: &str,
    store: &S,
    today: NaiveDate,
  ) -> Result<AttemptOutcome, DrillError> {
    let (QuizState::Ready, Some(current)) = (self.state, self.current) else {
      return Err(self.invalid("submit a guess"));
    };
    let entry = &self.pool[current];
    let attempt_number = self.attempts_on_current + 1;
    let correct = spelling_matches(guess, &entry.word);
    let label = self.mode.map(|m| m.label()).unwrap_or_default();

    store.record_guess(&AttemptRecord::new(today, &entry.word, correct, attempt_number, &label))?;

    let outcome = AttemptOutcome {
      correct,
      word: entry.word.clone(),
      definition: entry.definition.clone(),
      sentence: entry.sentence.clone(),
      guess: guess.trim().to_string(),
      attempt_number,
    };
    tracing::debug!(
      "Guess #{} for '{}' was {}",
      attempt_number,
      entry.word,
      if correct { "correct" } else { "incorrect" }
    );

    self.attempts_on_current = attempt_number;
    self.last_outcome = Some(outcome.clone());
    self.state = QuizState::Checked;
    Ok(outcome)
  }

  /// Move on after a checked guess
  pub fn advance(&mut self) -> Result<&WordEntry, DrillError> {
    if self.state != QuizState::Checked {
      return Err(self.invalid("advance"));
    }
    self.draw_next();
    self.present_current()
  }

  /// Move on without guessing. Nothing is recorded.
  pub fn skip(&mut self) -> Result<&WordEntry, DrillError> {
    if self.state != QuizState::Ready {
      return Err(self.invalid("skip"));
    }
    if let Some(i) = self.current {
      tracing::debug!("Skipped '{}'", self.pool[i].word);
    }
    self.draw_next();
    self.present_current()
  }

  /// Try the same word again after a wrong guess. The attempt count is
  /// kept, so the next guess is recorded with the following attempt number.
  pub fn retry(&mut self) -> Result<&WordEntry, DrillError> {
    match (&self.state, &self.last_outcome) {
      (QuizState::Checked, Some(outcome)) if !outcome.correct => {}
      (QuizState::Checked, _) => {
        return Err(DrillError::InvalidStateTransition {
          op: "retry",
          state: "answered correctly",
        });
      }
      _ => return Err(self.invalid("retry")),
    }
    self.last_outcome = None;
    self.state = QuizState::Ready;
    self.present_current()
  }

  /// Forget the pool and return to Idle
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  fn draw_next(&mut self) {
    if self.draw_queue.is_empty() {
      self.draw_queue = (0..self.pool.len()).collect();
      self.draw_queue.shuffle(&mut rand::rng());
    }
    self.current = self.draw_queue.pop();
    self.attempts_on_current = 0;
    self.last_outcome = None;
    self.state = if self.current.is_some() {
      QuizState::Ready
    } else {
      QuizState::Idle
    };
  }

  fn invalid(&self, op: &'static str) -> DrillError {
    DrillError::InvalidStateTransition {
      op,
      state: self.state.as_str(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{mistake_tally, run_migrations};
  use crate::domain::DailyProgress;
  use rusqlite::Connection;
  use std::collections::HashSet;

  fn store() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
  }

  fn groups(words: &[&str]) -> GroupPartitioner {
    let mut entries: Vec<_> = words
      .iter()
      .filter_map(|w| WordEntry::new(w, Some(&format!("meaning of {}", w)), None))
      .collect();
    entries.sort_by_key(|e| e.sort_key());
    GroupPartitioner::new(entries, 13)
  }

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
  }

  /// Point the session at a specific word
  fn force_current(session: &mut QuizSession, word: &str) {
    let i = session.pool.iter().position(|e| e.word == word).unwrap();
    session.current = Some(i);
    session.draw_queue.retain(|&q| q != i);
  }

  #[test]
  fn test_new_session_is_idle() {
    let session = QuizSession::new();
    assert_eq!(session.state(), QuizState::Idle);
    assert!(session.present_current().is_err());
  }

  #[test]
  fn test_select_pool_draws_from_pool() {
    let conn = store();
    let groups = groups(&["cat", "dog", "emu"]);
    let mut session = QuizSession::new();

    let word = session.select_pool(PoolMode::All, &groups, &conn).unwrap().word.clone();
    assert!(["cat", "dog", "emu"].contains(&word.as_str()));
    assert_eq!(session.state(), QuizState::Ready);
    assert_eq!(session.remaining_in_queue(), 2);
    assert_eq!(session.attempts_on_current(), 0);
  }

  #[test]
  fn test_wrong_guess_is_recorded() {
    let conn = store();
    let groups = groups(&["cat", "dog", "emu"]);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();
    force_current(&mut session, "dog");

    let outcome = session.submit_guess("cat", &conn, today()).unwrap();
    assert!(!outcome.correct);
    assert_eq!(outcome.word, "dog");
    assert_eq!(outcome.definition, "meaning of dog");
    assert_eq!(session.state(), QuizState::Checked);
    assert_eq!(conn.today_progress(today()).unwrap(), DailyProgress::new(0, 1));
  }

  #[test]
  fn test_guess_is_trimmed_and_case_insensitive() {
    let conn = store();
    let groups = groups(&["cat", "dog", "emu"]);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();
    force_current(&mut session, "dog");

    let outcome = session.submit_guess("  Dog ", &conn, today()).unwrap();
    assert!(outcome.correct);
    assert_eq!(outcome.guess, "Dog");
    assert_eq!(conn.today_progress(today()).unwrap(), DailyProgress::new(1, 1));
  }

  #[test]
  fn test_guess_outside_ready_is_rejected() {
    let conn = store();
    let mut session = QuizSession::new();
    let err = session.submit_guess("cat", &conn, today()).unwrap_err();
    assert!(matches!(err, DrillError::InvalidStateTransition { state: "idle", .. }));

    let groups = groups(&["cat"]);
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();
    session.submit_guess("cat", &conn, today()).unwrap();
    let err = session.submit_guess("cat", &conn, today()).unwrap_err();
    assert!(matches!(err, DrillError::InvalidStateTransition { state: "checked", .. }));
    assert_eq!(conn.today_progress(today()).unwrap(), DailyProgress::new(1, 1));
  }

  #[test]
  fn test_failed_persistence_leaves_session_untouched() {
    let conn = store();
    let groups = groups(&["cat", "dog"]);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();
    let word = session.present_current().unwrap().word.clone();
    let queued = session.remaining_in_queue();

    conn.execute("DROP TABLE scores", []).unwrap();
    let err = session.submit_guess(&word, &conn, today()).unwrap_err();

    assert!(matches!(err, DrillError::Persistence(_)));
    assert_eq!(session.state(), QuizState::Ready);
    assert_eq!(session.attempts_on_current(), 0);
    assert_eq!(session.remaining_in_queue(), queued);
    assert!(session.last_outcome().is_none());
    assert_eq!(session.present_current().unwrap().word, word);
  }

  #[test]
  fn test_advance_requires_checked() {
    let conn = store();
    let groups = groups(&["cat", "dog"]);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();

    assert!(session.advance().is_err());
    session.submit_guess("zzz", &conn, today()).unwrap();
    session.advance().unwrap();
    assert_eq!(session.state(), QuizState::Ready);
    assert!(session.last_outcome().is_none());
    assert_eq!(session.attempts_on_current(), 0);
  }

  #[test]
  fn test_exhausted_deck_reshuffles_whole_pool() {
    let conn = store();
    let words = ["cat", "dog", "emu", "gnu"];
    let groups = groups(&words);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();

    let mut seen = HashSet::new();
    seen.insert(session.present_current().unwrap().word.clone());
    for _ in 1..words.len() {
      seen.insert(session.skip().unwrap().word.clone());
    }
    // Every word presented exactly once before the deck runs out
    assert_eq!(seen.len(), words.len());
    assert_eq!(session.remaining_in_queue(), 0);

    session.submit_guess("zzz", &conn, today()).unwrap();
    session.advance().unwrap();
    assert_eq!(session.remaining_in_queue(), words.len() - 1);

    let mut reshuffled: HashSet<usize> = session.draw_queue.iter().copied().collect();
    reshuffled.insert(session.current.unwrap());
    assert_eq!(reshuffled, (0..words.len()).collect());
  }

  #[test]
  fn test_skip_writes_nothing() {
    let conn = store();
    let groups = groups(&["cat", "dog"]);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();

    session.skip().unwrap();
    session.skip().unwrap();
    assert_eq!(conn.today_progress(today()).unwrap(), DailyProgress::default());

    session.submit_guess("zzz", &conn, today()).unwrap();
    assert!(session.skip().is_err());
  }

  #[test]
  fn test_retry_keeps_word_and_counts_attempts() {
    let conn = store();
    let groups = groups(&["rhythm"]);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();

    let first = session.submit_guess("rythm", &conn, today()).unwrap();
    assert_eq!(first.attempt_number, 1);

    assert_eq!(session.retry().unwrap().word, "rhythm");
    assert_eq!(session.state(), QuizState::Ready);
    assert_eq!(session.attempts_on_current(), 1);

    let second = session.submit_guess("rhythm", &conn, today()).unwrap();
    assert!(second.correct);
    assert_eq!(second.attempt_number, 2);

    let err = session.retry().unwrap_err();
    assert!(matches!(err, DrillError::InvalidStateTransition { op: "retry", .. }));

    let attempts: Vec<i64> = conn
      .prepare("SELECT attempts FROM scores ORDER BY id")
      .unwrap()
      .query_map([], |row| row.get(0))
      .unwrap()
      .collect::<rusqlite::Result<_>>()
      .unwrap();
    assert_eq!(attempts, vec![1, 2]);
  }

  #[test]
  fn test_mode_label_is_recorded() {
    let conn = store();
    let words: Vec<String> = (0..26).map(|i| format!("w{:02}", i)).collect();
    let refs: Vec<&str> = words.iter().map(String::as_str).collect();
    let groups = groups(&refs);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::Group(3), &groups, &conn).unwrap();
    session.submit_guess("nope", &conn, today()).unwrap();

    let mode: String = conn
      .query_row("SELECT mode FROM scores", [], |row| row.get(0))
      .unwrap();
    assert_eq!(mode, "group-3");
  }

  #[test]
  fn test_incorrect_pool_follows_history() {
    let conn = store();
    let groups = groups(&["cat", "dog", "emu"]);
    let mut session = QuizSession::new();

    let err = session.select_pool(PoolMode::Incorrect, &groups, &conn).unwrap_err();
    assert!(matches!(err, DrillError::EmptyPool(_)));
    assert_eq!(session.state(), QuizState::Idle);

    session.select_pool(PoolMode::All, &groups, &conn).unwrap();
    force_current(&mut session, "emu");
    session.submit_guess("emew", &conn, today()).unwrap();

    let word = session.select_pool(PoolMode::Incorrect, &groups, &conn).unwrap();
    assert_eq!(word.word, "emu");
    assert_eq!(session.pool_len(), 1);
    assert_eq!(mistake_tally(&conn).unwrap()[0].word, "emu");
  }

  #[test]
  fn test_switching_pool_discards_progress() {
    let conn = store();
    let groups = groups(&["cat", "dog", "emu"]);
    let mut session = QuizSession::new();
    session.select_pool(PoolMode::All, &groups, &conn).unwrap();
    session.submit_guess("zzz", &conn, today()).unwrap();

    session.select_pool(PoolMode::Group(2), &groups, &conn).unwrap();
    assert_eq!(session.state(), QuizState::Ready);
    assert_eq!(session.attempts_on_current(), 0);
    assert!(session.last_outcome().is_none());
    assert_eq!(session.present_current().unwrap().word, "dog");
    assert_eq!(session.mode(), Some(PoolMode::Group(2)));
  }
}
