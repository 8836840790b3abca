/*!
 * Row-level operations on the vocabulary tables.
 *
 * All functions take a plain `Connection` so they run inside whatever
 * transaction the caller has open on it. Statements go through the
 * connection's prepared statement cache and are compiled once per
 * connection.
 */

use rusqlite::{params, Connection, OptionalExtension};

use crate::ingest::models::{Phrase, Translation};

/// Outcome of a get-or-create on the `words` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The word was already stored under this id
    Existing(i64),
    /// The word was inserted and got this id
    Created(i64),
}

impl Resolution {
    /// Surrogate id of the word
    pub fn id(self) -> i64 {
        match self {
            Resolution::Existing(id) | Resolution::Created(id) => id,
        }
    }

    /// Whether the row was inserted by this call
    pub fn is_created(self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}

/// Look up a word by its natural key, inserting it when absent.
///
/// Must run in the same transaction as the child inserts that reference
/// the returned id. Only one writer resolves words at a time, so the
/// lookup-then-insert needs no extra locking.
pub fn resolve_word(conn: &Connection, word: &str) -> rusqlite::Result<Resolution> {
    let existing: Option<i64> = conn
        .prepare_cached("SELECT id FROM words WHERE word = ?1")?
        .query_row([word], |row| row.get(0))
        .optional()?;

    if let Some(id) = existing {
        return Ok(Resolution::Existing(id));
    }

    conn.prepare_cached("INSERT INTO words (word) VALUES (?1)")?
        .execute([word])?;

    Ok(Resolution::Created(conn.last_insert_rowid()))
}

/// Insert a translation row; returns false when it was already present
pub fn insert_translation(
    conn: &Connection,
    word_id: i64,
    translation: &Translation,
) -> rusqlite::Result<bool> {
    let changed = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO translations (word_id, translation, type) VALUES (?1, ?2, ?3)",
        )?
        .execute(params![word_id, translation.translation, translation.kind])?;

    Ok(changed > 0)
}

/// Insert a phrase row; returns false when it was already present
pub fn insert_phrase(conn: &Connection, word_id: i64, phrase: &Phrase) -> rusqlite::Result<bool> {
    let changed = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO phrases (word_id, phrase, translation) VALUES (?1, ?2, ?3)",
        )?
        .execute(params![word_id, phrase.phrase, phrase.translation])?;

    Ok(changed > 0)
}

/// Look up the id of a stored word
pub fn find_word_id(conn: &Connection, word: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row("SELECT id FROM words WHERE word = ?1", [word], |row| row.get(0))
        .optional()
}

/// Count rows of one of the vocabulary tables
pub fn count_rows(conn: &Connection, table: &'static str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
}
