pub mod audio;
pub mod exam;
pub mod learn;
pub mod reset;
pub mod stats;

use askama::Template;
use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::config;
use crate::db::{self, LogOnError};
use crate::domain::{DailyProgress, MistakeTally};
use crate::filters;
use crate::session::generate_session_id;
use crate::state::AppState;

/// Cookie holding the quiz session ID
pub const SESSION_COOKIE_NAME: &str = "spell_session";

/// Calendar date attempts are recorded under
pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

/// Read the session cookie, issuing a new one on first visit
pub fn session_cookie(jar: CookieJar) -> (CookieJar, String) {
  if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
    let id = cookie.value().to_string();
    return (jar, id);
  }

  let id = generate_session_id();
  let cookie = Cookie::build((SESSION_COOKIE_NAME, id.clone()))
    .path("/")
    .http_only(true)
    .secure(false)
    .max_age(time::Duration::hours(config::SESSION_EXPIRY_HOURS))
    .build();
  (jar.add(cookie), id)
}

/// Today's progress against the daily goal
#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
  pub correct_count: i64,
  pub total_attempted: i64,
  pub daily_goal: u32,
  pub goal_percentage: u32,
  pub goal_reached: bool,
}

impl ProgressView {
  pub fn new(progress: DailyProgress, daily_goal: u32) -> Self {
    Self {
      correct_count: progress.correct_count,
      total_attempted: progress.total_attempted,
      daily_goal,
      goal_percentage: progress.goal_percentage(daily_goal),
      goal_reached: progress.goal_reached(daily_goal),
    }
  }
}

/// One alphabetical group on the home page
pub struct GroupSummary {
  pub number: usize,
  pub size: usize,
  pub first: String,
  pub last: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub groups: Vec<GroupSummary>,
  pub total_words: usize,
  pub progress: ProgressView,
  pub mistakes: Vec<MistakeTally>,
  pub warning: Option<String>,
}

/// GET / - Home page
pub async fn index(State(state): State<AppState>) -> Html<String> {
  let snapshot = state.catalog.snapshot();

  let groups = snapshot
    .groups
    .groups()
    .map(|(number, words)| GroupSummary {
      number,
      size: words.len(),
      first: words.first().map(|w| w.word.clone()).unwrap_or_default(),
      last: words.last().map(|w| w.word.clone()).unwrap_or_default(),
    })
    .collect();

  let (progress, mistakes) = match db::try_lock(&state.db) {
    Ok(conn) => (
      db::today_progress(&conn, today()).log_warn_default("Failed to load today's progress"),
      db::mistake_tally(&conn).log_warn_default("Failed to load mistake tally"),
    ),
    Err(_) => (DailyProgress::default(), Vec::new()),
  };

  let template = IndexTemplate {
    groups,
    total_words: snapshot.groups.catalog().len(),
    progress: ProgressView::new(progress, state.daily_goal()),
    mistakes,
    warning: snapshot.warning.clone(),
  };

  Html(template.render().unwrap_or_default())
}

pub use audio::word_audio;
pub use exam::{
  exam_check, exam_next, exam_page, exam_progress, exam_retry, exam_select, exam_skip, exam_word,
  play_redirect,
};
pub use learn::{check_word, learn_group};
pub use reset::reset;
pub use stats::{incorrect_page, stats_page};
