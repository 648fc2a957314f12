//! Generated question/answer pairs

use rusqlite::{Connection, Result, Row, params};

use crate::domain::{FlashcardSource, QaPair};

/// Store a generated batch for one PDF in a single transaction
pub fn insert_flashcards(
    conn: &mut Connection,
    guild_id: i64,
    pdf_id: i64,
    pairs: &[QaPair],
) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO flashcards (guild_id, question, answer, pdf_id) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for pair in pairs {
            stmt.execute(params![guild_id, pair.question, pair.answer, pdf_id])?;
        }
    }
    tx.commit()?;
    Ok(pairs.len())
}

/// Flashcards for a guild in insertion order, optionally from one PDF
pub fn get_flashcards(
    conn: &Connection,
    guild_id: i64,
    source: FlashcardSource,
) -> Result<Vec<QaPair>> {
    let pairs = match source {
        FlashcardSource::All => {
            let mut stmt = conn.prepare(
                "SELECT question, answer FROM flashcards WHERE guild_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map(params![guild_id], row_to_pair)?
                .collect::<Result<Vec<_>>>()?;
            rows
        }
        FlashcardSource::Pdf(pdf_id) => {
            let mut stmt = conn.prepare(
                "SELECT question, answer FROM flashcards WHERE guild_id = ?1 AND pdf_id = ?2 ORDER BY id",
            )?;
            let rows = stmt
                .query_map(params![guild_id, pdf_id], row_to_pair)?
                .collect::<Result<Vec<_>>>()?;
            rows
        }
    };

    Ok(pairs)
}

pub fn count_flashcards(conn: &Connection, guild_id: i64, source: FlashcardSource) -> Result<i64> {
    match source {
        FlashcardSource::All => conn.query_row(
            "SELECT COUNT(*) FROM flashcards WHERE guild_id = ?1",
            params![guild_id],
            |row| row.get(0),
        ),
        FlashcardSource::Pdf(pdf_id) => conn.query_row(
            "SELECT COUNT(*) FROM flashcards WHERE guild_id = ?1 AND pdf_id = ?2",
            params![guild_id, pdf_id],
            |row| row.get(0),
        ),
    }
}

fn row_to_pair(row: &Row) -> Result<QaPair> {
    Ok(QaPair {
        question: row.get(0)?,
        answer: row.get(1)?,
    })
}
