use axum::Json;

use crate::render::{self, Embed};

/// GET /help
pub async fn help() -> Json<Embed> {
  Json(render::help_embed())
}
