//! Exam mode: hear a word, type it, every guess is recorded.
//!
//! The page is static; `static/js/quiz.js` drives the JSON endpoints below.
//! The current word never leaves the server until a guess has been checked.

use askama::Template;
use axum::{
  extract::State,
  response::{Html, Redirect},
  Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::{session_cookie, today, ProgressView};
use crate::db::{self, LogOnError};
use crate::domain::PoolMode;
use crate::error::DrillError;
use crate::filters;
use crate::quiz::{QuizSession, QuizState};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "exam.html")]
pub struct ExamTemplate {
  pub group_numbers: Vec<usize>,
  pub progress: ProgressView,
  pub warning: Option<String>,
}

#[derive(Deserialize)]
pub struct SelectForm {
  pub mode: String,
}

#[derive(Deserialize)]
pub struct CheckForm {
  #[serde(default)]
  pub spelling: String,
}

/// What the client may know about the current word before guessing
#[derive(Debug, Serialize)]
pub struct WordResponse {
  pub success: bool,
  pub state: QuizState,
  pub mode: Option<String>,
  pub mode_name: Option<String>,
  pub audio_url: Option<String>,
  pub attempts: u32,
  pub pool_size: usize,
  pub remaining: usize,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
  pub success: bool,
  pub is_correct: bool,
  pub feedback: String,
  pub current_word: String,
  pub word_meaning: String,
  pub sentence: String,
  pub guess: String,
  pub attempt_number: u32,
  pub progress: ProgressView,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
  pub success: bool,
  #[serde(flatten)]
  pub progress: ProgressView,
}

/// GET /exam - Exam page
pub async fn exam_page(State(state): State<AppState>) -> Html<String> {
  let snapshot = state.catalog.snapshot();
  let progress = match db::try_lock(&state.db) {
    Ok(conn) => db::today_progress(&conn, today()).log_warn_default("Failed to load today's progress"),
    Err(_) => Default::default(),
  };

  let template = ExamTemplate {
    group_numbers: (1..=snapshot.groups.group_count()).collect(),
    progress: ProgressView::new(progress, state.daily_goal()),
    warning: snapshot.warning.clone(),
  };
  Html(template.render().unwrap_or_default())
}

/// GET /play - Old name of the exam page
pub async fn play_redirect() -> Redirect {
  Redirect::to("/exam")
}

/// POST /api/exam/select - Choose a pool and draw its first word
pub async fn exam_select(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<SelectForm>,
) -> Result<(CookieJar, Json<WordResponse>), DrillError> {
  let mode: PoolMode = form.mode.parse().map_err(DrillError::InvalidMode)?;
  let (jar, session_id) = session_cookie(jar);
  let snapshot = state.catalog.snapshot();

  // A failed selection still discards the old pool
  let (quiz, word) = state.sessions.with_session(&session_id, |quiz| -> Result<_, DrillError> {
    let conn = db::try_lock(&state.db)?;
    let word = quiz.select_pool(mode, &snapshot.groups, &*conn)?.word.clone();
    Ok((quiz.clone(), word))
  })?;

  tracing::info!("Session switched to {} ({} words)", mode, quiz.pool_len());
  let response = word_response(&state, &quiz, &word).await;
  Ok((jar, Json(response)))
}

/// GET /api/exam/word - Current word's audio and quiz position
pub async fn exam_word(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<(CookieJar, Json<WordResponse>), DrillError> {
  let (jar, session_id) = session_cookie(jar);
  let quiz = state.sessions.get(&session_id);
  let word = quiz.present_current()?.word.clone();
  let response = word_response(&state, &quiz, &word).await;
  Ok((jar, Json(response)))
}

/// POST /api/exam/check - Score a guess against the current word
pub async fn exam_check(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<CheckForm>,
) -> Result<(CookieJar, Json<CheckResponse>), DrillError> {
  let (jar, session_id) = session_cookie(jar);
  let date = today();

  // The session stays locked from the READY check until it is CHECKED
  let outcome = state.sessions.with_session(&session_id, |quiz| -> Result<_, DrillError> {
    let conn = db::try_lock(&state.db)?;
    quiz.submit_guess(&form.spelling, &*conn, date)
  })?;

  // Display only: the guess is already saved
  let progress = match db::try_lock(&state.db) {
    Ok(conn) => db::today_progress(&conn, date).log_warn_default("Failed to load today's progress"),
    Err(_) => Default::default(),
  };

  let feedback = if outcome.correct {
    format!("Correct! The word was '{}'.", outcome.word)
  } else {
    format!("Incorrect. The correct spelling is '{}'.", outcome.word)
  };

  Ok((
    jar,
    Json(CheckResponse {
      success: true,
      is_correct: outcome.correct,
      feedback,
      current_word: outcome.word,
      word_meaning: outcome.definition,
      sentence: outcome.sentence,
      guess: outcome.guess,
      attempt_number: outcome.attempt_number,
      progress: ProgressView::new(progress, state.daily_goal()),
    }),
  ))
}

/// POST /api/exam/next - Next word after a checked guess
pub async fn exam_next(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<(CookieJar, Json<WordResponse>), DrillError> {
  transition(state, jar, |quiz| quiz.advance().map(|e| e.word.clone())).await
}

/// POST /api/exam/skip - Next word without guessing
pub async fn exam_skip(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<(CookieJar, Json<WordResponse>), DrillError> {
  transition(state, jar, |quiz| quiz.skip().map(|e| e.word.clone())).await
}

/// POST /api/exam/retry - Same word again after a wrong guess
pub async fn exam_retry(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<(CookieJar, Json<WordResponse>), DrillError> {
  transition(state, jar, |quiz| quiz.retry().map(|e| e.word.clone())).await
}

/// GET /api/exam/progress - Today's progress
pub async fn exam_progress(State(state): State<AppState>) -> Result<Json<ProgressResponse>, DrillError> {
  let progress = {
    let conn = db::try_lock(&state.db)?;
    db::today_progress(&conn, today())?
  };
  Ok(Json(ProgressResponse {
    success: true,
    progress: ProgressView::new(progress, state.daily_goal()),
  }))
}

/// Apply a storage-free session operation and report the new word
async fn transition(
  state: AppState,
  jar: CookieJar,
  op: impl FnOnce(&mut QuizSession) -> Result<String, DrillError>,
) -> Result<(CookieJar, Json<WordResponse>), DrillError> {
  let (jar, session_id) = session_cookie(jar);
  let (quiz, word) = state
    .sessions
    .with_session(&session_id, |quiz| op(quiz).map(|word| (quiz.clone(), word)))?;

  let response = word_response(&state, &quiz, &word).await;
  Ok((jar, Json(response)))
}

async fn word_response(state: &AppState, quiz: &QuizSession, word: &str) -> WordResponse {
  WordResponse {
    success: true,
    state: quiz.state(),
    mode: quiz.mode().map(|m| m.label()),
    mode_name: quiz.mode().map(|m| m.display_name()),
    audio_url: state.audio.audio_url(word).await,
    attempts: quiz.attempts_on_current(),
    pool_size: quiz.pool_len(),
    remaining: quiz.remaining_in_queue(),
  }
}
