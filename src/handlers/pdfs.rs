//! PDF registration and the flashcards generated from them.

use axum::Json;
use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::StatusCode;
use rusqlite::ErrorCode;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ApiError;
use crate::db::{self, DbPool, LogOnError, try_lock};
use crate::domain::{FlashcardSource, PdfRecord, QaPair};
use crate::paths;
use crate::render::{self, Embed};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub id: i64,
  pub title: String,
}

#[derive(Debug, Serialize)]
pub struct PdfListResponse {
  pub embed: Embed,
  pub pdfs: Vec<PdfRecord>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
  pub embed: Embed,
  pub flashcards_deleted: usize,
}

#[derive(Debug, Deserialize)]
pub struct StoreFlashcardsRequest {
  pub pairs: Vec<QaPair>,
}

#[derive(Debug, Serialize)]
pub struct StoreFlashcardsResponse {
  pub pdf_id: i64,
  pub inserted: usize,
  /// Flashcards now stored for this PDF
  pub total: i64,
}

/// Store an uploaded PDF under the guild's upload directory.
///
/// POST /guilds/{guild_id}/pdfs (multipart, field `file`)
pub async fn upload_pdf(
  State(state): State<AppState>,
  UrlPath(guild_id): UrlPath<i64>,
  mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
  let mut upload = None;
  while let Some(field) = multipart.next_field().await? {
    if field.name() != Some("file") {
      continue;
    }
    let file_name = field.file_name().unwrap_or_default().to_string();
    let bytes = field.bytes().await?;
    upload = Some((file_name, bytes));
    break;
  }

  let (file_name, bytes) =
    upload.ok_or_else(|| ApiError::BadRequest("Missing `file` field.".to_string()))?;

  let title = paths::sanitize_file_name(&file_name)
    .filter(|name| name.to_lowercase().ends_with(".pdf"))
    .ok_or_else(|| ApiError::BadRequest("Please upload a PDF file.".to_string()))?;

  {
    let conn = try_lock(&state.db)?;
    if db::pdf_title_exists(&conn, guild_id, &title)? {
      return Err(already_stored());
    }
  }

  let id = store_upload(&state.db, &state.uploads_dir, guild_id, &title, &bytes).await?;

  tracing::info!(
    "Stored PDF '{}' ({} bytes) for guild {} as index {}",
    title,
    bytes.len(),
    guild_id,
    id
  );

  Ok((StatusCode::CREATED, Json(UploadResponse { id, title })))
}

/// Write the upload beside its final path, record it, then move it into place.
///
/// The final file is only touched once the row is committed, so a losing
/// duplicate never overwrites a stored PDF.
async fn store_upload(
  db: &DbPool,
  uploads_dir: &Path,
  guild_id: i64,
  title: &str,
  bytes: &[u8],
) -> Result<i64, ApiError> {
  let path = paths::guild_upload_path(uploads_dir, guild_id, title);
  let partial = path.with_file_name(format!("{}.{:016x}.part", title, rand::random::<u64>()));
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(&partial, bytes).await?;

  let inserted = {
    let conn = try_lock(db)?;
    db::insert_pdf(&conn, guild_id, &path.to_string_lossy(), title)
  };
  let id = match inserted {
    Ok(id) => id,
    Err(e) => {
      discard(&partial).await;
      return Err(match e {
        rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation => {
          already_stored()
        }
        e => e.into(),
      });
    }
  };

  if let Err(e) = tokio::fs::rename(&partial, &path).await {
    discard(&partial).await;
    let mut conn = try_lock(db)?;
    db::delete_pdf(&mut conn, guild_id, id).log_warn("Failed to roll back PDF record");
    return Err(e.into());
  }

  Ok(id)
}

async fn discard(partial: &Path) {
  tokio::fs::remove_file(partial)
    .await
    .log_warn("Failed to remove partial upload");
}

fn already_stored() -> ApiError {
  ApiError::Conflict("PDF content already stored.".to_string())
}

/// GET /guilds/{guild_id}/pdfs
pub async fn list_pdfs(
  State(state): State<AppState>,
  UrlPath(guild_id): UrlPath<i64>,
) -> Result<Json<PdfListResponse>, ApiError> {
  let pdfs = {
    let conn = try_lock(&state.db)?;
    db::list_pdfs(&conn, guild_id)?
  };

  if pdfs.is_empty() {
    return Err(ApiError::NotFound(
      "No PDFs have been uploaded yet.".to_string(),
    ));
  }

  Ok(Json(PdfListResponse {
    embed: render::pdf_list_embed(&pdfs),
    pdfs,
  }))
}

/// Delete a PDF, its stored file and its flashcards.
///
/// DELETE /guilds/{guild_id}/pdfs/{pdf_id}
pub async fn delete_pdf(
  State(state): State<AppState>,
  UrlPath((guild_id, pdf_id)): UrlPath<(i64, i64)>,
) -> Result<Json<DeleteResponse>, ApiError> {
  let pdf = {
    let conn = try_lock(&state.db)?;
    db::get_pdf(&conn, guild_id, pdf_id)?
  }
  .ok_or_else(|| ApiError::NotFound(format!("No PDF found with index {}.", pdf_id)))?;

  // A missing file must not block removing the records
  tokio::fs::remove_file(&pdf.path)
    .await
    .log_warn("Failed to delete stored PDF file");

  let flashcards_deleted = {
    let mut conn = try_lock(&state.db)?;
    db::delete_pdf(&mut conn, guild_id, pdf_id)?
  };

  tracing::info!(
    "Deleted PDF '{}' (index {}) and {} flashcard(s) for guild {}",
    pdf.title,
    pdf_id,
    flashcards_deleted,
    guild_id
  );

  Ok(Json(DeleteResponse {
    embed: render::pdf_deleted_embed(&pdf),
    flashcards_deleted,
  }))
}

/// Save question/answer pairs produced by the external generator.
///
/// POST /guilds/{guild_id}/pdfs/{pdf_id}/flashcards
pub async fn store_flashcards(
  State(state): State<AppState>,
  UrlPath((guild_id, pdf_id)): UrlPath<(i64, i64)>,
  Json(request): Json<StoreFlashcardsRequest>,
) -> Result<(StatusCode, Json<StoreFlashcardsResponse>), ApiError> {
  let mut conn = try_lock(&state.db)?;

  if db::get_pdf(&conn, guild_id, pdf_id)?.is_none() {
    return Err(ApiError::NotFound(
      "PDF content not found. Please enter a valid index number.".to_string(),
    ));
  }

  if request.pairs.is_empty() {
    return Err(ApiError::Unprocessable(
      "No questions were generated from the PDF.".to_string(),
    ));
  }

  let inserted = db::insert_flashcards(&mut conn, guild_id, pdf_id, &request.pairs)?;
  let total = db::count_flashcards(&conn, guild_id, FlashcardSource::Pdf(pdf_id))?;
  tracing::info!(
    "Stored {} flashcard(s) for PDF {} in guild {} ({} total)",
    inserted,
    pdf_id,
    guild_id,
    total
  );

  Ok((
    StatusCode::CREATED,
    Json(StoreFlashcardsResponse {
      pdf_id,
      inserted,
      total,
    }),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn setup() -> (TempDir, DbPool) {
    let temp = TempDir::new().unwrap();
    let db = db::init_db(&temp.path().join("flashdeck.db")).unwrap();
    (temp, db)
  }

  #[tokio::test]
  async fn test_store_upload_moves_file_into_place() {
    let (temp, db) = setup();
    let uploads = temp.path().join("uploads");

    let id = store_upload(&db, &uploads, 4, "notes.pdf", b"first").await.unwrap();
    assert_eq!(id, 1);

    let entries: Vec<_> = std::fs::read_dir(uploads.join("4"))
      .unwrap()
      .map(|e| e.unwrap().file_name().into_string().unwrap())
      .collect();
    assert_eq!(entries, vec!["notes.pdf".to_string()]);
  }

  #[tokio::test]
  async fn test_losing_duplicate_keeps_stored_bytes() {
    let (temp, db) = setup();
    let uploads = temp.path().join("uploads");
    store_upload(&db, &uploads, 4, "notes.pdf", b"first").await.unwrap();

    // Same title slipping past the existence check
    let result = store_upload(&db, &uploads, 4, "notes.pdf", b"second").await;
    assert!(matches!(result, Err(ApiError::Conflict(_))));

    let stored = std::fs::read(uploads.join("4").join("notes.pdf")).unwrap();
    assert_eq!(stored, b"first");
    assert_eq!(std::fs::read_dir(uploads.join("4")).unwrap().count(), 1);
  }
}
