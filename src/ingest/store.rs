/*!
 * Storage seam between the writer and the relational backend.
 *
 * The writer only talks to a `Store`, so it can be driven against SQLite
 * in production and against an in-memory double in tests.
 */

use log::debug;
use rusqlite::Connection;

use crate::database::repository::{self, Resolution};
use crate::database::{schema, DatabaseConnection};
use crate::errors::{SchemaError, WriteError};

use super::models::{Phrase, Translation};

/// Transactional backend the writer persists into.
///
/// Methods between `begin` and `commit`/`rollback` belong to the same
/// transaction. The writer is the only caller during a run.
pub trait Store: Send + 'static {
    /// Create any missing table
    fn ensure_schema(&mut self) -> Result<(), SchemaError>;

    /// Open a new transaction
    fn begin(&mut self) -> Result<(), WriteError>;

    /// Get-or-create the word row inside the open transaction
    fn resolve_word(&mut self, word: &str) -> Result<Resolution, WriteError>;

    /// Insert a translation; false when it already existed
    fn insert_translation(
        &mut self,
        word_id: i64,
        word: &str,
        translation: &Translation,
    ) -> Result<bool, WriteError>;

    /// Insert a phrase; false when it already existed
    fn insert_phrase(&mut self, word_id: i64, word: &str, phrase: &Phrase)
        -> Result<bool, WriteError>;

    /// Make the open transaction durable
    fn commit(&mut self) -> Result<(), WriteError>;

    /// Discard the open transaction
    fn rollback(&mut self) -> Result<(), WriteError>;
}

/// `Store` backed by a SQLite connection
#[derive(Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Underlying connection handle
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
        map_err: impl FnOnce(String) -> WriteError,
    ) -> Result<T, WriteError> {
        self.db
            .execute(|conn| Ok(f(conn)))
            .map_err(|e| WriteError::Store(e.to_string()))?
            .map_err(|e| map_err(e.to_string()))
    }
}

impl Store for SqliteStore {
    fn ensure_schema(&mut self) -> Result<(), SchemaError> {
        self.db
            .execute(|conn| Ok(schema::ensure_schema(conn)))
            .map_err(|e| SchemaError::Connection(e.to_string()))?
            .map(|_| ())
    }

    fn begin(&mut self) -> Result<(), WriteError> {
        debug!("Beginning transaction");
        self.with_conn(|conn| conn.execute_batch("BEGIN IMMEDIATE"), WriteError::Begin)
    }

    fn resolve_word(&mut self, word: &str) -> Result<Resolution, WriteError> {
        self.with_conn(
            |conn| repository::resolve_word(conn, word),
            |message| WriteError::Resolve {
                word: word.to_string(),
                message,
            },
        )
    }

    fn insert_translation(
        &mut self,
        word_id: i64,
        word: &str,
        translation: &Translation,
    ) -> Result<bool, WriteError> {
        self.with_conn(
            |conn| repository::insert_translation(conn, word_id, translation),
            |message| WriteError::Insert {
                table: schema::TRANSLATIONS_TABLE,
                word: word.to_string(),
                message,
            },
        )
    }

    fn insert_phrase(
        &mut self,
        word_id: i64,
        word: &str,
        phrase: &Phrase,
    ) -> Result<bool, WriteError> {
        self.with_conn(
            |conn| repository::insert_phrase(conn, word_id, phrase),
            |message| WriteError::Insert {
                table: schema::PHRASES_TABLE,
                word: word.to_string(),
                message,
            },
        )
    }

    fn commit(&mut self) -> Result<(), WriteError> {
        self.with_conn(|conn| conn.execute_batch("COMMIT"), WriteError::Commit)
    }

    fn rollback(&mut self) -> Result<(), WriteError> {
        self.with_conn(|conn| conn.execute_batch("ROLLBACK"), WriteError::Store)
    }
}
