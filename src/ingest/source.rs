/*!
 * Input sources and the reader task that feeds the writer.
 *
 * A source turns one input unit into a complete list of word records.
 * Readers never emit partial units: a unit that fails to read or parse
 * is skipped as a whole.
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::errors::SourceError;

use super::models::{Batch, WordRecord};

/// One input unit that can be read into word records
#[async_trait]
pub trait Source: Send + Sync {
    /// Human-readable unit name used in logs and reports
    fn unit(&self) -> String;

    /// Read and parse the whole unit
    async fn read(&self) -> Result<Vec<WordRecord>, SourceError>;
}

/// JSON file holding an array of word records
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Source reading the file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build one source per path
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<Arc<dyn Source>> {
        paths
            .iter()
            .map(|p| Arc::new(Self::new(p)) as Arc<dyn Source>)
            .collect()
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse raw file content into records
    pub fn parse(unit: &str, content: &[u8]) -> Result<Vec<WordRecord>, SourceError> {
        serde_json::from_slice(content).map_err(|source| SourceError::Parse {
            unit: unit.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Source for JsonFileSource {
    fn unit(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<Vec<WordRecord>, SourceError> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                unit: self.unit(),
                source,
            })?;

        Self::parse(&self.unit(), &content)
    }
}

/// What happened to one unit
#[derive(Debug)]
pub enum ReadOutcome {
    /// Every record of the unit was handed to the writer
    Delivered { unit: String, records: usize },
    /// The unit was skipped because it could not be read or parsed
    Skipped(SourceError),
    /// The writer stopped before the unit could be delivered
    Abandoned { unit: String },
}

/// Read one unit and send its records to the writer.
///
/// With a chunk size the records go out as consecutive sub-batches,
/// otherwise as a single batch. Dropping `sender` on return is what lets
/// the coordinator close the channel once every reader is done.
pub async fn read_unit(
    source: Arc<dyn Source>,
    chunk_size: Option<usize>,
    sender: mpsc::Sender<Batch>,
) -> ReadOutcome {
    let unit = source.unit();

    let records = match source.read().await {
        Ok(records) => records,
        Err(e) => {
            warn!("Skipping unit: {}", e);
            return ReadOutcome::Skipped(e);
        }
    };

    let total = records.len();
    debug!("Parsed {} records from {}", total, unit);

    for batch in split_into_batches(&unit, records, chunk_size) {
        if sender.send(batch).await.is_err() {
            debug!("Writer stopped before {} was delivered", unit);
            return ReadOutcome::Abandoned { unit };
        }
    }

    ReadOutcome::Delivered {
        unit,
        records: total,
    }
}

/// Split a unit into batches of at most `chunk_size` records
pub fn split_into_batches(
    unit: &str,
    records: Vec<WordRecord>,
    chunk_size: Option<usize>,
) -> Vec<Batch> {
    match chunk_size {
        Some(size) if size > 0 && records.len() > size => {
            let mut batches = Vec::with_capacity(records.len().div_ceil(size));
            let mut rest = records;
            while !rest.is_empty() {
                let tail = rest.split_off(size.min(rest.len()));
                batches.push(Batch::new(unit, rest));
                rest = tail;
            }
            batches
        }
        _ => vec![Batch::new(unit, records)],
    }
}
