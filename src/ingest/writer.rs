/*!
 * Single consumer that persists batches in fixed-size transactions.
 *
 * The writer counts word records, not batches: a transaction is committed
 * after every `commit_every` records no matter which unit they came from,
 * and the remainder is flushed once the channel closes. Transactions are
 * opened lazily, so an idle writer never holds one.
 */

use log::{debug, error, warn};
use tokio::sync::mpsc;

use crate::errors::{IngestError, WriteError};

use super::models::{Batch, WordRecord};
use super::store::Store;

/// Word records per transaction unless configured otherwise
pub const DEFAULT_COMMIT_EVERY: usize = 1000;

/// Totals of everything the writer made durable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Word records whose transaction committed
    pub records_committed: usize,
    /// Number of successful commits
    pub commits: usize,
    /// Batches taken off the channel
    pub batches_received: usize,
    /// New rows in `words`
    pub words_created: usize,
    /// New rows in `translations`
    pub translations_inserted: usize,
    /// New rows in `phrases`
    pub phrases_inserted: usize,
}

/// Counters of the open transaction, folded into the summary on commit
#[derive(Debug, Default)]
struct PendingTransaction {
    records: usize,
    words_created: usize,
    translations_inserted: usize,
    phrases_inserted: usize,
}

/// Writer owning the store for the duration of a run
pub struct BatchWriter<S: Store> {
    store: S,
    commit_every: usize,
    /// `None` while no transaction is open
    pending: Option<PendingTransaction>,
    summary: WriteSummary,
    records_processed: usize,
}

impl<S: Store> BatchWriter<S> {
    /// Create a writer committing every `commit_every` records (at least 1)
    pub fn new(store: S, commit_every: usize) -> Self {
        Self {
            store,
            commit_every: commit_every.max(1),
            pending: None,
            summary: WriteSummary::default(),
            records_processed: 0,
        }
    }

    /// Totals so far
    pub fn summary(&self) -> &WriteSummary {
        &self.summary
    }

    /// Records written so far, committed or not
    pub fn records_processed(&self) -> usize {
        self.records_processed
    }

    /// Whether a transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }

    /// Drain the channel until every sender is gone, then flush.
    ///
    /// Blocks the calling thread; run it on a blocking task. The receiver
    /// is dropped when this returns, so readers still sending after a
    /// failure get an error instead of waiting forever.
    pub fn drain(mut self, mut receiver: mpsc::Receiver<Batch>) -> Result<WriteSummary, IngestError> {
        while let Some(batch) = receiver.blocking_recv() {
            debug!("Writing {} records from {}", batch.len(), batch.unit);
            self.summary.batches_received += 1;

            if let Err(e) = self.write_batch(&batch) {
                return Err(self.failure(e));
            }
        }

        match self.finish() {
            Ok(()) => Ok(self.summary),
            Err(e) => Err(self.failure(e)),
        }
    }

    /// Write every record of a batch, committing at each threshold.
    ///
    /// On error the open transaction is rolled back before returning.
    pub fn write_batch(&mut self, batch: &Batch) -> Result<(), WriteError> {
        for record in &batch.records {
            if let Err(e) = self.write_record(record) {
                error!("Aborting transaction in {}: {}", batch.unit, e);
                self.abort();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Commit whatever is left in the open transaction
    pub fn finish(&mut self) -> Result<(), WriteError> {
        if let Err(e) = self.commit_pending() {
            self.abort();
            return Err(e);
        }
        Ok(())
    }

    fn write_record(&mut self, record: &WordRecord) -> Result<(), WriteError> {
        if self.pending.is_none() {
            self.store.begin()?;
            self.pending = Some(PendingTransaction::default());
        }

        let resolution = self.store.resolve_word(&record.word)?;
        let word_id = resolution.id();

        let mut translations_inserted = 0;
        for translation in &record.translations {
            if self.store.insert_translation(word_id, &record.word, translation)? {
                translations_inserted += 1;
            }
        }

        let mut phrases_inserted = 0;
        for phrase in &record.phrases {
            if self.store.insert_phrase(word_id, &record.word, phrase)? {
                phrases_inserted += 1;
            }
        }

        self.records_processed += 1;

        let pending_records = match self.pending.as_mut() {
            Some(pending) => {
                pending.records += 1;
                pending.words_created += usize::from(resolution.is_created());
                pending.translations_inserted += translations_inserted;
                pending.phrases_inserted += phrases_inserted;
                pending.records
            }
            None => return Err(WriteError::Store("Transaction closed mid-record".to_string())),
        };

        if pending_records >= self.commit_every {
            self.commit_pending()?;
        }

        Ok(())
    }

    fn commit_pending(&mut self) -> Result<(), WriteError> {
        if self.pending.is_none() {
            return Ok(());
        }

        self.store.commit()?;

        if let Some(pending) = self.pending.take() {
            self.summary.records_committed += pending.records;
            self.summary.commits += 1;
            self.summary.words_created += pending.words_created;
            self.summary.translations_inserted += pending.translations_inserted;
            self.summary.phrases_inserted += pending.phrases_inserted;
            debug!(
                "Committed {} records ({} total)",
                pending.records, self.summary.records_committed
            );
        }

        Ok(())
    }

    fn abort(&mut self) {
        if self.pending.take().is_some() {
            if let Err(e) = self.store.rollback() {
                warn!("Rollback failed: {}", e);
            }
        }
    }

    fn failure(&self, source: WriteError) -> IngestError {
        IngestError::Write {
            source,
            records_committed: self.summary.records_committed,
            records_processed: self.records_processed,
        }
    }
}
