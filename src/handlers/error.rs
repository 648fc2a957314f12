use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::DbLockError;
use crate::deck::DeckError;
use crate::session::SessionError;

/// Errors returned by the JSON handlers as `{"error": message}`
#[derive(Debug)]
pub enum ApiError {
  BadRequest(String),
  NotFound(String),
  Conflict(String),
  Unprocessable(String),
  Internal(String),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match self {
      Self::Internal(detail) => {
        tracing::error!("Request failed: {}", detail);
        "An internal error occurred.".to_string()
      }
      Self::BadRequest(m) | Self::NotFound(m) | Self::Conflict(m) | Self::Unprocessable(m) => m,
    };

    (status, Json(serde_json::json!({ "error": message }))).into_response()
  }
}

impl From<rusqlite::Error> for ApiError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Internal(format!("database error: {}", e))
  }
}

impl From<DbLockError> for ApiError {
  fn from(e: DbLockError) -> Self {
    Self::Internal(e.to_string())
  }
}

impl From<std::io::Error> for ApiError {
  fn from(e: std::io::Error) -> Self {
    Self::Internal(format!("io error: {}", e))
  }
}

impl From<MultipartError> for ApiError {
  fn from(e: MultipartError) -> Self {
    Self::BadRequest(format!("Invalid upload: {}", e.body_text()))
  }
}

impl From<DeckError> for ApiError {
  fn from(e: DeckError) -> Self {
    match e {
      DeckError::EmptyDeck => Self::NotFound("No flashcards found.".to_string()),
      DeckError::InvalidRating(_) => Self::BadRequest(e.to_string()),
      DeckError::Stale => Self::Conflict(e.to_string()),
    }
  }
}

impl From<SessionError> for ApiError {
  fn from(e: SessionError) -> Self {
    match e {
      SessionError::NotFound => {
        Self::NotFound("No active flashcard session. Use play to start one.".to_string())
      }
      SessionError::Deck(deck) => deck.into(),
    }
  }
}
