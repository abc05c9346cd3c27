//! Error kinds raised by the drill core and how they surface over HTTP.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::DbLockError;

#[derive(Debug, Error)]
pub enum DrillError {
  /// Word list missing or unreadable. Callers degrade to an empty catalog.
  #[error("word list unavailable: {0}")]
  DataSource(String),

  /// The selected pool resolved to zero words
  #[error("no words in this selection ({0})")]
  EmptyPool(String),

  #[error("{0}")]
  InvalidMode(String),

  #[error("group {group} does not exist (expected 1..={group_count})")]
  InvalidGroup { group: usize, group_count: usize },

  /// Any read or write against the score database
  #[error("storage error: {0}")]
  Persistence(#[from] rusqlite::Error),

  #[error("database unavailable")]
  DatabaseUnavailable,

  /// Operation called from a state that does not allow it
  #[error("cannot {op} while the quiz is {state}")]
  InvalidStateTransition { op: &'static str, state: &'static str },

  #[error("reset requires confirmation")]
  Confirmation,
}

impl From<DbLockError> for DrillError {
  fn from(_: DbLockError) -> Self {
    Self::DatabaseUnavailable
  }
}

impl DrillError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::DataSource(_) => "DATA_SOURCE",
      Self::EmptyPool(_) => "EMPTY_POOL",
      Self::InvalidMode(_) => "INVALID_MODE",
      Self::InvalidGroup { .. } => "INVALID_GROUP",
      Self::Persistence(_) => "PERSISTENCE",
      Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
      Self::InvalidStateTransition { .. } => "INVALID_STATE",
      Self::Confirmation => "CONFIRMATION_REQUIRED",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::DataSource(_) => StatusCode::SERVICE_UNAVAILABLE,
      Self::EmptyPool(_) | Self::InvalidStateTransition { .. } => StatusCode::CONFLICT,
      Self::InvalidMode(_) | Self::InvalidGroup { .. } | Self::Confirmation => {
        StatusCode::BAD_REQUEST
      }
      Self::Persistence(_) | Self::DatabaseUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
  pub success: bool,
  pub error: String,
  pub code: &'static str,
}

impl IntoResponse for DrillError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("{}", self);
    } else {
      tracing::warn!("{}", self);
    }

    let body = ErrorResponse {
      success: false,
      error: self.to_string(),
      code: self.code(),
    };
    (status, Json(body)).into_response()
  }
}
