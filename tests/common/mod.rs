/*!
 * Common test utilities for the wordbank test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use wordbank::errors::SourceError;
use wordbank::ingest::{JsonFileSource, Source, WordRecord};


/// Route library logs to the test output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Writes records as a JSON unit file
pub fn create_unit_file(dir: &Path, filename: &str, records: &[WordRecord]) -> Result<PathBuf> {
    create_test_file(dir, filename, &serde_json::to_string_pretty(records)?)
}

/// Generates `count` distinct words, each with one translation and one phrase
pub fn generate_records(prefix: &str, count: usize) -> Vec<WordRecord> {
    (0..count)
        .map(|i| {
            let word = format!("{}{}", prefix, i);
            WordRecord::new(&word)
                .with_translation(format!("{}-translation", word), "n")
                .with_phrase(format!("{} phrase", word), format!("{}-phrase", word))
        })
        .collect()
}

/// A small realistic unit
pub fn sample_records() -> Vec<WordRecord> {
    vec![
        WordRecord::new("run")
            .with_translation("跑", "v")
            .with_translation("运行", "v")
            .with_phrase("run out", "用完"),
        WordRecord::new("book")
            .with_translation("书", "n")
            .with_translation("预订", "v")
            .with_phrase("book a table", "订座"),
    ]
}

/// Wraps paths as JSON file sources
pub fn sources(paths: &[PathBuf]) -> Vec<Arc<dyn Source>> {
    JsonFileSource::from_paths(paths)
}

/// Source serving records from memory, or failing like an unreadable file
pub struct MemorySource {
    unit: String,
    records: Option<Vec<WordRecord>>,
}

impl MemorySource {
    pub fn new(unit: &str, records: Vec<WordRecord>) -> Arc<dyn Source> {
        Arc::new(Self {
            unit: unit.to_string(),
            records: Some(records),
        })
    }

    pub fn unreadable(unit: &str) -> Arc<dyn Source> {
        Arc::new(Self {
            unit: unit.to_string(),
            records: None,
        })
    }
}

#[async_trait::async_trait]
impl Source for MemorySource {
    fn unit(&self) -> String {
        self.unit.clone()
    }

    async fn read(&self) -> Result<Vec<WordRecord>, SourceError> {
        self.records.clone().ok_or_else(|| SourceError::Io {
            unit: self.unit.clone(),
            source: std::io::Error::other("simulated read failure"),
        })
    }
}

/// Source whose reader task panics
pub struct PanickingSource;

#[async_trait::async_trait]
impl Source for PanickingSource {
    fn unit(&self) -> String {
        "panicking".to_string()
    }

    async fn read(&self) -> Result<Vec<WordRecord>, SourceError> {
        panic!("reader blew up")
    }
}
