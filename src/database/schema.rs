/*!
 * Database schema definitions.
 *
 * This module contains the SQL for the three vocabulary tables and makes
 * sure each of them exists before an ingestion run starts.
 */

use log::{debug, info};
use rusqlite::Connection;

use crate::errors::SchemaError;

/// Parent table: one row per distinct word
pub const WORDS_TABLE: &str = "words";

/// Child table: translations of a word
pub const TRANSLATIONS_TABLE: &str = "translations";

/// Child table: phrases built around a word
pub const PHRASES_TABLE: &str = "phrases";

const CREATE_WORDS: &str = r#"
    CREATE TABLE IF NOT EXISTS words (
        id INTEGER PRIMARY KEY,
        word TEXT UNIQUE NOT NULL
    )
"#;

const CREATE_TRANSLATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS translations (
        id INTEGER PRIMARY KEY,
        word_id INTEGER NOT NULL,
        translation TEXT NOT NULL,
        type TEXT NOT NULL,
        FOREIGN KEY (word_id) REFERENCES words (id),
        UNIQUE(word_id, translation, type) ON CONFLICT IGNORE
    )
"#;

const CREATE_PHRASES: &str = r#"
    CREATE TABLE IF NOT EXISTS phrases (
        id INTEGER PRIMARY KEY,
        word_id INTEGER NOT NULL,
        phrase TEXT NOT NULL,
        translation TEXT NOT NULL,
        FOREIGN KEY (word_id) REFERENCES words (id),
        UNIQUE(word_id, phrase, translation) ON CONFLICT IGNORE
    )
"#;

/// Tables in creation order; children reference `words`
const TABLES: [(&str, &str); 3] = [
    (WORDS_TABLE, CREATE_WORDS),
    (TRANSLATIONS_TABLE, CREATE_TRANSLATIONS),
    (PHRASES_TABLE, CREATE_PHRASES),
];

/// Make sure every table exists, creating only the missing ones.
///
/// Returns the names of the tables created by this call, so an already
/// initialized database yields an empty list.
pub fn ensure_schema(conn: &Connection) -> Result<Vec<&'static str>, SchemaError> {
    let mut created = Vec::new();

    for (table, create_sql) in TABLES {
        if table_exists(conn, table)? {
            debug!("Table '{}' already exists", table);
            continue;
        }

        conn.execute_batch(create_sql)
            .map_err(|source| SchemaError::Create { table, source })?;
        created.push(table);
    }

    if !created.is_empty() {
        info!("Created tables: {}", created.join(", "));
    }

    Ok(created)
}

/// Check whether a table with the given name exists
pub fn table_exists(conn: &Connection, table: &'static str) -> Result<bool, SchemaError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .map_err(|source| SchemaError::Query { table, source })?;

    Ok(count > 0)
}
