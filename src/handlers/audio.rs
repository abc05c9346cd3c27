use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AudioResponse {
  pub success: bool,
  pub audio_url: String,
}

/// GET /api/audio/{word} - Synthesize (or reuse) audio for a catalog word
pub async fn word_audio(
  State(state): State<AppState>,
  Path(word): Path<String>,
) -> (StatusCode, Json<AudioResponse>) {
  // Only words from the list reach the speech command
  let snapshot = state.catalog.snapshot();
  let Some(entry) = snapshot.groups.catalog().iter().find(|e| e.is_word(&word)) else {
    tracing::warn!("Audio requested for unknown word '{}'", word);
    return failure(StatusCode::NOT_FOUND);
  };

  match state.audio.audio_url(&entry.word).await {
    Some(audio_url) => (
      StatusCode::OK,
      Json(AudioResponse {
        success: true,
        audio_url,
      }),
    ),
    None => failure(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

fn failure(status: StatusCode) -> (StatusCode, Json<AudioResponse>) {
  (
    status,
    Json(AudioResponse {
      success: false,
      audio_url: String::new(),
    }),
  )
}
