//! Flashcard play sessions: start, rate, reveal.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use super::ApiError;
use crate::db::{self, try_lock};
use crate::deck::Deck;
use crate::domain::FlashcardSource;
use crate::render::{self, PlayMessage};
use crate::session::SessionKey;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
  /// "all" or a PDF index
  #[serde(default = "default_source")]
  pub source: String,
}

fn default_source() -> String {
  "all".to_string()
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
  pub score: i32,
}

/// Start a new deck for the user, replacing any running one.
///
/// POST /guilds/{guild_id}/users/{user_id}/play
pub async fn start_play(
  State(state): State<AppState>,
  Path((guild_id, user_id)): Path<(i64, i64)>,
  Json(request): Json<PlayRequest>,
) -> Result<Json<PlayMessage>, ApiError> {
  let source = FlashcardSource::parse(&request.source).ok_or_else(|| {
    ApiError::BadRequest("Use a PDF index number or \"all\".".to_string())
  })?;

  let pairs = {
    let conn = try_lock(&state.db)?;
    db::get_flashcards(&conn, guild_id, source)?
  };

  let count = pairs.len();
  let deck = Deck::new(pairs)?;
  let key = SessionKey::new(guild_id, user_id);
  let view = state.sessions.start(key, deck);

  tracing::info!("Started session {} with {} flashcard(s)", key, count);

  Ok(Json(render::play_message(view)))
}

/// GET /guilds/{guild_id}/users/{user_id}/session
pub async fn session_view(
  State(state): State<AppState>,
  Path((guild_id, user_id)): Path<(i64, i64)>,
) -> Result<Json<PlayMessage>, ApiError> {
  let view = state.sessions.view(SessionKey::new(guild_id, user_id))?;
  Ok(Json(render::play_message(view)))
}

/// POST /guilds/{guild_id}/users/{user_id}/rate
pub async fn rate(
  State(state): State<AppState>,
  Path((guild_id, user_id)): Path<(i64, i64)>,
  Json(request): Json<RateRequest>,
) -> Result<Json<PlayMessage>, ApiError> {
  let key = SessionKey::new(guild_id, user_id);
  let (outcome, view) = state.sessions.rate(key, request.score)?;

  tracing::debug!(
    "Session {}: card {} rated {} -> mastery {}{}",
    key,
    outcome.card_number,
    request.score,
    outcome.mastery,
    if outcome.retired { " (mastered)" } else { "" }
  );
  if outcome.completed {
    tracing::info!("Session {} completed", key);
  }

  Ok(Json(render::play_message(view)))
}

/// POST /guilds/{guild_id}/users/{user_id}/reveal
pub async fn reveal(
  State(state): State<AppState>,
  Path((guild_id, user_id)): Path<(i64, i64)>,
) -> Result<Json<PlayMessage>, ApiError> {
  let (view, answer) = state.sessions.reveal(SessionKey::new(guild_id, user_id))?;
  Ok(Json(render::reveal_message(view, &answer)))
}
