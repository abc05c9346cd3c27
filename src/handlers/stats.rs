use askama::Template;
use axum::{extract::State, response::Html};
use chrono::Duration;

use super::today;
use crate::config;
use crate::db::{self, DailyAccuracy, IncorrectEntry, LogOnError};
use crate::domain::MistakeTally;
use crate::filters;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
  pub window_days: i64,
  pub daily_stats: Vec<DailyAccuracy>,
}

#[derive(Template)]
#[template(path = "incorrect.html")]
pub struct IncorrectTemplate {
  pub history: Vec<IncorrectEntry>,
  pub unique_words: Vec<MistakeTally>,
}

/// GET /stats - Daily accuracy over the last 30 days
pub async fn stats_page(State(state): State<AppState>) -> Html<String> {
  let since = today() - Duration::days(config::STATS_WINDOW_DAYS);
  let daily_stats = match db::try_lock(&state.db) {
    Ok(conn) => db::daily_accuracy(&conn, since).log_warn_default("Failed to load daily accuracy"),
    Err(_) => Vec::new(),
  };

  let template = StatsTemplate {
    window_days: config::STATS_WINDOW_DAYS,
    daily_stats,
  };
  Html(template.render().unwrap_or_default())
}

/// GET /incorrect - Every misspelling, plus a per-word tally
pub async fn incorrect_page(State(state): State<AppState>) -> Html<String> {
  let (history, unique_words) = match db::try_lock(&state.db) {
    Ok(conn) => (
      db::incorrect_history(&conn).log_warn_default("Failed to load incorrect history"),
      db::mistake_tally(&conn).log_warn_default("Failed to load mistake tally"),
    ),
    Err(_) => (Vec::new(), Vec::new()),
  };

  let template = IncorrectTemplate {
    history,
    unique_words,
  };
  Html(template.render().unwrap_or_default())
}
