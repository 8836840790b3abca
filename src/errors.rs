/*!
 * Error types for the wordbank ingestion pipeline.
 *
 * Each failure category of a run has its own enum, built with the
 * thiserror crate:
 * - `SourceError`: one input unit could not be read or parsed (recoverable)
 * - `SchemaError`: the target tables could not be verified or created (fatal)
 * - `WriteError`: a resolve, insert or commit failed inside a transaction (fatal)
 * - `IngestError`: the terminal error of a whole run
 */

use thiserror::Error;

/// Errors raised while reading a single input unit
#[derive(Error, Debug)]
pub enum SourceError {
    /// The unit could not be read from disk
    #[error("Failed to read {unit}: {source}")]
    Io {
        /// Unit name (usually the file path)
        unit: String,
        #[source]
        source: std::io::Error,
    },

    /// The unit content is not a valid list of word records
    #[error("Failed to parse {unit}: {source}")]
    Parse {
        /// Unit name (usually the file path)
        unit: String,
        #[source]
        source: serde_json::Error,
    },

    /// The reader task died before producing a result
    #[error("Reader task for {unit} failed: {message}")]
    Task {
        /// Unit name (usually the file path)
        unit: String,
        /// Join error description
        message: String,
    },
}

impl SourceError {
    /// Name of the unit this error belongs to
    pub fn unit(&self) -> &str {
        match self {
            Self::Io { unit, .. } | Self::Parse { unit, .. } | Self::Task { unit, .. } => unit,
        }
    }
}

/// Errors raised while making sure the target tables exist
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Could not check whether a table exists
    #[error("Failed to check table '{table}': {source}")]
    Query {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Could not create a missing table
    #[error("Failed to create table '{table}': {source}")]
    Create {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// The store could not hand out a connection
    #[error("Store connection error: {0}")]
    Connection(String),
}

/// Errors raised by the writer inside a transaction
#[derive(Error, Debug)]
pub enum WriteError {
    /// A new transaction could not be started
    #[error("Failed to begin transaction: {0}")]
    Begin(String),

    /// Looking up or creating a word failed
    #[error("Failed to resolve word '{word}': {message}")]
    Resolve { word: String, message: String },

    /// Inserting a child row failed
    #[error("Failed to insert into {table} for word '{word}': {message}")]
    Insert {
        table: &'static str,
        word: String,
        message: String,
    },

    /// The current transaction could not be committed
    #[error("Failed to commit transaction: {0}")]
    Commit(String),

    /// Any other store failure (lock poisoning, rollback misuse)
    #[error("Store error: {0}")]
    Store(String),
}

/// Terminal error of an ingestion run
#[derive(Error, Debug)]
pub enum IngestError {
    /// Schema setup failed; no reader was launched
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The writer stopped on a failed transaction
    #[error(
        "Write error after {records_committed} committed of {records_processed} processed records: {source}"
    )]
    Write {
        #[source]
        source: WriteError,
        /// Records durably committed before the failure
        records_committed: usize,
        /// Records fully written before the failure, including the rolled back ones
        records_processed: usize,
    },

    /// The writer task panicked or was cancelled
    #[error("Writer task failed: {0}")]
    Task(String),
}

impl IngestError {
    /// Records durably committed before the run stopped
    pub fn records_committed(&self) -> usize {
        match self {
            Self::Write {
                records_committed, ..
            } => *records_committed,
            _ => 0,
        }
    }
}
