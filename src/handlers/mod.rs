pub mod error;
pub mod help;
pub mod pdfs;
pub mod play;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::config;
use crate::state::AppState;

pub use error::ApiError;
pub use help::help;
pub use pdfs::{delete_pdf, list_pdfs, store_flashcards, upload_pdf};
pub use play::{rate, reveal, session_view, start_play};

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/help", get(help))
    .route("/guilds/{guild_id}/pdfs", get(list_pdfs).post(upload_pdf))
    .route("/guilds/{guild_id}/pdfs/{pdf_id}", delete(delete_pdf))
    .route(
      "/guilds/{guild_id}/pdfs/{pdf_id}/flashcards",
      post(store_flashcards),
    )
    .route("/guilds/{guild_id}/users/{user_id}/play", post(start_play))
    .route("/guilds/{guild_id}/users/{user_id}/session", get(session_view))
    .route("/guilds/{guild_id}/users/{user_id}/rate", post(rate))
    .route("/guilds/{guild_id}/users/{user_id}/reveal", post(reveal))
    .layer(DefaultBodyLimit::max(config::MAX_UPLOAD_BYTES))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
