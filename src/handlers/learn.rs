//! Learn mode: browse a group with vowels masked and self-check spellings.
//! Nothing here is recorded.

use axum::{
  extract::{Path, State},
  Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::mask_vowels;
use crate::error::DrillError;
use crate::quiz::spelling_matches;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LearnWord {
  pub word: String,
  pub masked: String,
  pub definition: String,
  pub sentence: String,
  /// Endpoint that synthesizes this word on demand
  pub audio_endpoint: String,
}

#[derive(Debug, Serialize)]
pub struct LearnGroupResponse {
  pub success: bool,
  pub group_num: usize,
  pub words: Vec<LearnWord>,
}

#[derive(Debug, Deserialize)]
pub struct CheckWordRequest {
  #[serde(default)]
  pub word: String,
  #[serde(default)]
  pub spelling: String,
}

#[derive(Debug, Serialize)]
pub struct CheckWordResponse {
  pub correct: bool,
  pub definition: String,
  pub sentence: String,
}

/// GET /api/learn/group/{n} - Words of one group, vowels masked
pub async fn learn_group(
  State(state): State<AppState>,
  Path(group_num): Path<usize>,
) -> Result<Json<LearnGroupResponse>, DrillError> {
  let snapshot = state.catalog.snapshot();
  let words = snapshot.groups.group(group_num).ok_or(DrillError::InvalidGroup {
    group: group_num,
    group_count: snapshot.groups.group_count(),
  })?;

  let words = words
    .iter()
    .map(|entry| LearnWord {
      word: entry.word.clone(),
      masked: mask_vowels(&entry.word),
      definition: entry.definition.clone(),
      sentence: entry.sentence.clone(),
      audio_endpoint: format!("/api/audio/{}", urlencoding::encode(&entry.word)),
    })
    .collect();

  Ok(Json(LearnGroupResponse {
    success: true,
    group_num,
    words,
  }))
}

/// POST /check_word - Self-check a spelling in learn mode
pub async fn check_word(
  State(state): State<AppState>,
  Json(request): Json<CheckWordRequest>,
) -> Json<CheckWordResponse> {
  let snapshot = state.catalog.snapshot();
  let entry = snapshot
    .groups
    .catalog()
    .iter()
    .find(|e| e.is_word(&request.word));

  Json(CheckWordResponse {
    correct: spelling_matches(&request.spelling, &request.word),
    definition: entry.map(|e| e.definition.clone()).unwrap_or_default(),
    sentence: entry.map(|e| e.sentence.clone()).unwrap_or_default(),
  })
}
