use axum::{extract::State, response::Redirect, Form};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::session_cookie;
use crate::db;
use crate::error::DrillError;
use crate::quiz::QuizSession;
use crate::state::AppState;

/// Value the confirmation field must carry
pub const RESET_CONFIRMATION: &str = "RESET";

#[derive(Deserialize)]
pub struct ResetForm {
  #[serde(default)]
  pub confirm: String,
}

/// POST /reset - Delete all recorded attempts and daily progress
pub async fn reset(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<ResetForm>,
) -> Result<(CookieJar, Redirect), DrillError> {
  if form.confirm.trim() != RESET_CONFIRMATION {
    return Err(DrillError::Confirmation);
  }

  {
    let conn = db::try_lock(&state.db)?;
    db::reset_all(&conn)?;
  }

  // The incorrect pool may no longer exist
  let (jar, session_id) = session_cookie(jar);
  state.sessions.update(&session_id, QuizSession::new());

  Ok((jar, Redirect::to("/")))
}
