/*!
 * Database settings and reporting types.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQLite journal mode applied when a connection is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    /// Write-ahead log; readers never block the writer
    #[default]
    Wal,
    /// Classic rollback journal
    Delete,
    /// Journal kept in memory only
    Memory,
}

impl JournalMode {
    /// Pragma statement that switches a connection to this mode
    pub fn pragma(&self) -> String {
        format!("PRAGMA journal_mode={};", self)
    }
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalMode::Wal => write!(f, "wal"),
            JournalMode::Delete => write!(f, "delete"),
            JournalMode::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for JournalMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wal" => Ok(JournalMode::Wal),
            "delete" => Ok(JournalMode::Delete),
            "memory" => Ok(JournalMode::Memory),
            _ => Err(anyhow::anyhow!("Invalid journal mode: {}", s)),
        }
    }
}

/// Row counts of the vocabulary tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Number of distinct words
    pub word_count: i64,
    /// Number of translation rows
    pub translation_count: i64,
    /// Number of phrase rows
    pub phrase_count: i64,
    /// Database file size in bytes (0 for in-memory databases)
    pub file_size_bytes: u64,
}

impl fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Words: {}, Translations: {}, Phrases: {}, Size: {} KB",
            self.word_count,
            self.translation_count,
            self.phrase_count,
            self.file_size_bytes / 1024
        )
    }
}
