//! Registered PDF files, scoped per guild

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

use crate::domain::PdfRecord;

pub fn insert_pdf(conn: &Connection, guild_id: i64, path: &str, title: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO pdfs (guild_id, pdf_path, pdf_title, uploaded_at) VALUES (?1, ?2, ?3, ?4)",
        params![guild_id, path, title, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Whether a file with this name was already uploaded to the guild
pub fn pdf_title_exists(conn: &Connection, guild_id: i64, title: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM pdfs WHERE guild_id = ?1 AND pdf_title = ?2",
        params![guild_id, title],
        |row| row.get(0),
    )
}

pub fn list_pdfs(conn: &Connection, guild_id: i64) -> Result<Vec<PdfRecord>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, guild_id, pdf_path, pdf_title, uploaded_at
    FROM pdfs WHERE guild_id = ?1
    ORDER BY id
    "#,
    )?;

    let pdfs = stmt
        .query_map(params![guild_id], row_to_pdf)?
        .collect::<Result<Vec<_>>>()?;

    Ok(pdfs)
}

pub fn get_pdf(conn: &Connection, guild_id: i64, id: i64) -> Result<Option<PdfRecord>> {
    conn.query_row(
        r#"
    SELECT id, guild_id, pdf_path, pdf_title, uploaded_at
    FROM pdfs WHERE id = ?1 AND guild_id = ?2
    "#,
        params![id, guild_id],
        row_to_pdf,
    )
    .optional()
}

/// Delete a PDF and its flashcards, returning how many flashcards went with it
pub fn delete_pdf(conn: &mut Connection, guild_id: i64, id: i64) -> Result<usize> {
    let tx = conn.transaction()?;
    let flashcards = tx.execute(
        "DELETE FROM flashcards WHERE pdf_id = ?1 AND guild_id = ?2",
        params![id, guild_id],
    )?;
    tx.execute(
        "DELETE FROM pdfs WHERE id = ?1 AND guild_id = ?2",
        params![id, guild_id],
    )?;
    tx.commit()?;
    Ok(flashcards)
}

fn row_to_pdf(row: &Row) -> Result<PdfRecord> {
    let uploaded_at: String = row.get(4)?;
    Ok(PdfRecord {
        id: row.get(0)?,
        guild_id: row.get(1)?,
        path: row.get(2)?,
        title: row.get(3)?,
        uploaded_at: DateTime::parse_from_rfc3339(&uploaded_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
