/*!
 * Tests for the batch writer against the mock store
 */

use wordbank::errors::{IngestError, WriteError};
use wordbank::ingest::{Batch, BatchWriter, WordRecord};

use crate::common::{self, mock_store::MockStore};

#[test]
fn test_writeBatch_with2500Records_shouldCommitInThousands() {
    let store = MockStore::new();
    let state = store.state();
    let mut writer = BatchWriter::new(store, 1000);

    writer
        .write_batch(&Batch::new("all", common::generate_records("w", 2500)))
        .unwrap();
    writer.finish().unwrap();

    assert_eq!(state.lock().unwrap().commit_sizes, vec![1000, 1000, 500]);
    assert_eq!(writer.summary().records_committed, 2500);
    assert_eq!(writer.summary().commits, 3);
}

#[test]
fn test_writeBatch_withManySmallBatches_shouldCountAcrossBoundaries() {
    let store = MockStore::new();
    let state = store.state();
    let mut writer = BatchWriter::new(store, 1000);

    for i in 0..25 {
        let batch = Batch::new(
            format!("unit-{}", i),
            common::generate_records(&format!("u{}-", i), 100),
        );
        writer.write_batch(&batch).unwrap();
    }
    writer.finish().unwrap();

    assert_eq!(state.lock().unwrap().commit_sizes, vec![1000, 1000, 500]);
}

#[test]
fn test_writeBatch_withExactMultiple_shouldNotOpenEmptyTransaction() {
    let store = MockStore::new();
    let state = store.state();
    let mut writer = BatchWriter::new(store, 100);

    writer
        .write_batch(&Batch::new("u", common::generate_records("w", 200)))
        .unwrap();
    writer.finish().unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.commit_sizes, vec![100, 100]);
    assert_eq!(state.begins, 2);
}

#[test]
fn test_writeBatch_withFailingWord_shouldRollBackOpenTransactionOnly() {
    let store = MockStore::failing_on("w150");
    let state = store.state();
    let mut writer = BatchWriter::new(store, 100);

    let result = writer.write_batch(&Batch::new("u", common::generate_records("w", 300)));

    assert!(matches!(result, Err(WriteError::Resolve { ref word, .. }) if word == "w150"));
    assert!(!writer.in_transaction());
    assert_eq!(writer.summary().records_committed, 100);
    assert_eq!(writer.records_processed(), 150);

    let state = state.lock().unwrap();
    assert_eq!(state.rollbacks, 1);
    assert_eq!(state.committed.words.len(), 100);
    assert!(!state.committed.words.contains_key("w120"));
}

#[test]
fn test_writeBatch_withDuplicateChildren_shouldCountNewRowsOnly() {
    let store = MockStore::new();
    let state = store.state();
    let mut writer = BatchWriter::new(store, 1000);
    let record = WordRecord::new("x")
        .with_translation("xify", "t")
        .with_translation("xify", "t")
        .with_phrase("xify", "t");

    writer
        .write_batch(&Batch::new("u", vec![record.clone(), record]))
        .unwrap();
    writer.finish().unwrap();

    let summary = writer.summary();
    assert_eq!(summary.words_created, 1);
    assert_eq!(summary.translations_inserted, 1);
    assert_eq!(summary.phrases_inserted, 1);

    let state = state.lock().unwrap();
    assert_eq!(state.committed.translations.len(), 1);
    assert_eq!(state.committed.phrases.len(), 1);
}

#[test]
fn test_drain_withFailure_shouldReturnProgressAndDropReceiver() {
    let store = MockStore::failing_on("b3");
    let writer = BatchWriter::new(store, 2);
    let (tx, rx) = tokio::sync::mpsc::channel(4);
    tx.blocking_send(Batch::new("a", common::generate_records("a", 3)))
        .unwrap();
    tx.blocking_send(Batch::new("b", common::generate_records("b", 5)))
        .unwrap();

    let result = writer.drain(rx);

    match result {
        Err(IngestError::Write {
            records_committed,
            records_processed,
            ..
        }) => {
            // a0..b2 fill three transactions, b3 fails in a fresh one
            assert_eq!(records_committed, 6);
            assert_eq!(records_processed, 6);
        }
        other => panic!("Expected write error, got {:?}", other),
    }
    assert!(tx.blocking_send(Batch::new("c", Vec::new())).is_err());
}

#[test]
fn test_writeBatch_withFailingThresholdCommit_shouldRollBackAndKeepEarlierCommit() {
    let store = MockStore::failing_commit(2);
    let state = store.state();
    let mut writer = BatchWriter::new(store, 2);

    let result = writer.write_batch(&Batch::new("u", common::generate_records("w", 5)));

    assert!(matches!(result, Err(WriteError::Commit(_))));
    assert!(!writer.in_transaction());
    assert_eq!(writer.summary().records_committed, 2);
    assert_eq!(writer.summary().commits, 1);
    assert_eq!(writer.records_processed(), 4);

    let state = state.lock().unwrap();
    assert_eq!(state.commit_sizes, vec![2]);
    assert_eq!(state.rollbacks, 1);
    assert_eq!(state.committed.words.len(), 2);
    assert!(!state.committed.words.contains_key("w2"));
}

#[test]
fn test_drain_withFailingTrailingCommit_shouldReportNothingCommitted() {
    let store = MockStore::failing_commit(1);
    let state = store.state();
    let writer = BatchWriter::new(store, 1000);
    let (tx, rx) = tokio::sync::mpsc::channel(1);
    tx.blocking_send(Batch::new("u", common::generate_records("w", 3)))
        .unwrap();
    drop(tx);

    let result = writer.drain(rx);

    match result {
        Err(IngestError::Write {
            source: WriteError::Commit(_),
            records_committed,
            records_processed,
        }) => {
            assert_eq!(records_committed, 0);
            assert_eq!(records_processed, 3);
        }
        other => panic!("Expected commit error, got {:?}", other),
    }

    let state = state.lock().unwrap();
    assert_eq!(state.rollbacks, 1);
    assert!(state.commit_sizes.is_empty());
    assert!(state.committed.words.is_empty());
}
