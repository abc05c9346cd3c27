//! In-memory storage for quiz sessions.
//!
//! Stores QuizSession state keyed by session ID (from cookie).
//! Sessions auto-expire after a configurable duration of inactivity.

use crate::config;
use crate::quiz::QuizSession;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Session entry with last access time for expiration
struct SessionEntry {
  session: QuizSession,
  last_access: DateTime<Utc>,
}

/// Quiz sessions for every browser that has visited
#[derive(Default)]
pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get a copy of the session for the given ID, creating an idle one
  pub fn get(&self, session_id: &str) -> QuizSession {
    self.with_session(session_id, |session| session.clone())
  }

  /// Run `op` on the stored session while holding the store lock.
  ///
  /// Whatever `op` leaves in the session is kept, even when it returns an
  /// error, and no other request sees the session in between.
  pub fn with_session<R>(&self, session_id: &str, op: impl FnOnce(&mut QuizSession) -> R) -> R {
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions, Utc::now());
    }

    let entry = sessions
      .entry(session_id.to_string())
      .or_insert_with(|| SessionEntry {
        session: QuizSession::new(),
        last_access: Utc::now(),
      });
    entry.last_access = Utc::now();
    op(&mut entry.session)
  }

  /// Store the session back after an operation
  pub fn update(&self, session_id: &str, session: QuizSession) {
    self.lock().insert(
      session_id.to_string(),
      SessionEntry {
        session,
        last_access: Utc::now(),
      },
    );
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    // Entries are plain values; a panic elsewhere cannot leave one half-written
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
  let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::quiz::QuizState;

  #[test]
  fn test_unknown_id_gets_idle_session() {
    let store = SessionStore::new();
    assert_eq!(store.get("abc").state(), QuizState::Idle);
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn test_update_then_get() {
    let store = SessionStore::new();
    let mut session = store.get("abc");
    session.reset();
    store.update("abc", session);
    store.update("def", QuizSession::new());
    assert_eq!(store.len(), 2);
  }

  #[test]
  fn test_with_session_keeps_changes_on_error() {
    use crate::catalog::GroupPartitioner;
    use crate::domain::{PoolMode, WordEntry};
    use crate::testing::TestEnv;
    use chrono::NaiveDate;

    let env = TestEnv::new().unwrap();
    let words = vec![WordEntry::new("gnome", None, None).unwrap()];
    let groups = GroupPartitioner::new(words, 13);
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let store = SessionStore::new();

    // Guess saved, then a later step fails
    let result: Result<(), &str> = store.with_session("abc", |quiz| {
      quiz.select_pool(PoolMode::All, &groups, &env.conn).unwrap();
      quiz.submit_guess("gnome", &env.conn, today).unwrap();
      Err("progress read failed")
    });
    assert!(result.is_err());

    let quiz = store.get("abc");
    assert_eq!(quiz.state(), QuizState::Checked);
    assert_eq!(quiz.attempts_on_current(), 1);

    // A second guess on the same presentation is refused
    let again = store.with_session("abc", |quiz| quiz.submit_guess("gnome", &env.conn, today).is_err());
    assert!(again);
  }

  #[test]
  fn test_cleanup_drops_stale_entries() {
    let mut sessions = HashMap::new();
    let now = Utc::now();
    sessions.insert(
      "stale".to_string(),
      SessionEntry {
        session: QuizSession::new(),
        last_access: now - Duration::hours(config::SESSION_EXPIRY_HOURS + 1),
      },
    );
    sessions.insert(
      "fresh".to_string(),
      SessionEntry {
        session: QuizSession::new(),
        last_access: now,
      },
    );

    cleanup_expired(&mut sessions, now);
    assert!(sessions.contains_key("fresh"));
    assert!(!sessions.contains_key("stale"));
  }

  #[test]
  fn test_session_id_shape() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(id, generate_session_id());
  }
}
