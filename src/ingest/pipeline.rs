/*!
 * Pipeline coordinator: fan-in from concurrent readers to one writer.
 *
 * One reader task is spawned per source and one writer runs on a blocking
 * thread. The channel is closed only after every reader has finished,
 * which is what tells the writer to flush and stop.
 */

use futures::future::join_all;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::errors::{IngestError, SourceError};

use super::source::{read_unit, ReadOutcome, Source};
use super::store::Store;
use super::writer::{BatchWriter, WriteSummary, DEFAULT_COMMIT_EVERY};

/// Tunables of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Word records per transaction
    pub commit_every: usize,
    /// Split each unit into sub-batches of this many records
    pub chunk_size: Option<usize>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            commit_every: DEFAULT_COMMIT_EVERY,
            chunk_size: None,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Units handed to the pipeline
    pub units_total: usize,
    /// Units whose records all reached the writer
    pub units_ingested: usize,
    /// Units that could not be read or parsed
    pub skipped: Vec<SourceError>,
    /// Word records made durable
    pub records_committed: usize,
    /// Transactions committed
    pub commits: usize,
    /// New rows in `words`
    pub words_created: usize,
    /// New rows in `translations`
    pub translations_inserted: usize,
    /// New rows in `phrases`
    pub phrases_inserted: usize,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl IngestReport {
    fn from_summary(summary: WriteSummary) -> Self {
        Self {
            records_committed: summary.records_committed,
            commits: summary.commits,
            words_created: summary.words_created,
            translations_inserted: summary.translations_inserted,
            phrases_inserted: summary.phrases_inserted,
            ..Self::default()
        }
    }

    /// Names of the skipped units
    pub fn skipped_units(&self) -> Vec<&str> {
        self.skipped.iter().map(|e| e.unit()).collect()
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Units: {}/{} ingested ({} skipped), Records: {} in {} commits, New words: {}, New translations: {}, New phrases: {}, Time: {:.2}s",
            self.units_ingested,
            self.units_total,
            self.skipped.len(),
            self.records_committed,
            self.commits,
            self.words_created,
            self.translations_inserted,
            self.phrases_inserted,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Coordinates readers and the writer for one run
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Ingest every source into the store.
    ///
    /// Unreadable units are skipped and listed in the report. Schema and
    /// write failures end the run with an error; transactions committed
    /// before a write failure stay in the store.
    pub async fn run<S: Store>(
        &self,
        store: S,
        sources: Vec<Arc<dyn Source>>,
    ) -> Result<IngestReport, IngestError> {
        let started = Instant::now();

        let store = tokio::task::spawn_blocking(move || {
            let mut store = store;
            store.ensure_schema().map(|()| store)
        })
        .await
        .map_err(|e| IngestError::Task(e.to_string()))??;

        info!("Ingesting {} units", sources.len());

        let (sender, receiver) = mpsc::channel(sources.len().max(1));

        let readers: Vec<_> = sources
            .iter()
            .map(|source| {
                tokio::spawn(read_unit(
                    source.clone(),
                    self.options.chunk_size,
                    sender.clone(),
                ))
            })
            .collect();

        let commit_every = self.options.commit_every;
        let writer = tokio::task::spawn_blocking(move || {
            BatchWriter::new(store, commit_every).drain(receiver)
        });

        let outcomes = join_all(readers).await;

        // Last sender: closing it ends the writer's receive loop
        drop(sender);

        let written = writer
            .await
            .map_err(|e| IngestError::Task(e.to_string()))?;

        let mut units_ingested = 0;
        let mut skipped = Vec::new();
        for (source, outcome) in sources.iter().zip(outcomes) {
            match outcome {
                Ok(ReadOutcome::Delivered { unit, records }) => {
                    debug!("Delivered {} records from {}", records, unit);
                    units_ingested += 1;
                }
                Ok(ReadOutcome::Skipped(error)) => skipped.push(error),
                Ok(ReadOutcome::Abandoned { unit }) => {
                    debug!("Unit {} was not fully delivered", unit);
                }
                Err(e) => {
                    let error = SourceError::Task {
                        unit: source.unit(),
                        message: e.to_string(),
                    };
                    warn!("Skipping unit: {}", error);
                    skipped.push(error);
                }
            }
        }

        let mut report = IngestReport::from_summary(written?);
        report.units_total = sources.len();
        report.units_ingested = units_ingested;
        report.skipped = skipped;
        report.elapsed = started.elapsed();

        info!("{}", report);
        Ok(report)
    }
}

/// Ingest the sources with default options
pub async fn ingest<S: Store>(
    store: S,
    sources: Vec<Arc<dyn Source>>,
) -> Result<IngestReport, IngestError> {
    Pipeline::default().run(store, sources).await
}
