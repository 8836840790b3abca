/*!
 * Pipeline coordination, commit boundaries and failure handling
 * against the mock store
 */

use wordbank::errors::{IngestError, SourceError, WriteError};
use wordbank::ingest::{ingest, Pipeline, PipelineOptions};

use crate::common::{self, mock_store::MockStore, MemorySource, PanickingSource};

#[tokio::test(flavor = "multi_thread")]
async fn test_run_with2500RecordsFromThreeUnits_shouldCommitThreeTimes() {
    let store = MockStore::new();
    let state = store.state();
    let sources = vec![
        MemorySource::new("a", common::generate_records("a", 700)),
        MemorySource::new("b", common::generate_records("b", 900)),
        MemorySource::new("c", common::generate_records("c", 900)),
    ];

    let report = ingest(store, sources).await.unwrap();

    assert_eq!(state.lock().unwrap().commit_sizes, vec![1000, 1000, 500]);
    assert_eq!(report.commits, 3);
    assert_eq!(report.records_committed, 2500);
    assert_eq!(report.units_ingested, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_with2500RecordsInOneUnit_shouldCommitThreeTimes() {
    let store = MockStore::new();
    let state = store.state();

    ingest(store, vec![MemorySource::new("all", common::generate_records("w", 2500))])
        .await
        .unwrap();

    assert_eq!(state.lock().unwrap().commit_sizes, vec![1000, 1000, 500]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_withChunking_shouldNotChangeCommitBoundaries() {
    let store = MockStore::new();
    let state = store.state();
    let pipeline = Pipeline::new(PipelineOptions {
        commit_every: 1000,
        chunk_size: Some(64),
    });

    pipeline
        .run(
            store,
            vec![
                MemorySource::new("a", common::generate_records("a", 1300)),
                MemorySource::new("b", common::generate_records("b", 1200)),
            ],
        )
        .await
        .unwrap();

    assert_eq!(state.lock().unwrap().commit_sizes, vec![1000, 1000, 500]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_withUnreadableUnit_shouldSkipItAndKeepOthers() {
    let store = MockStore::new();
    let state = store.state();
    let sources = vec![
        MemorySource::new("a", common::generate_records("a", 5)),
        MemorySource::unreadable("lost"),
        MemorySource::new("b", common::generate_records("b", 5)),
        MemorySource::new("c", common::generate_records("c", 5)),
    ];

    let report = ingest(store, sources).await.unwrap();

    assert_eq!(report.units_ingested, 3);
    assert_eq!(report.skipped_units(), vec!["lost"]);
    assert_eq!(state.lock().unwrap().committed.words.len(), 15);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_withPanickingReader_shouldReportTaskSkip() {
    let store = MockStore::new();
    let sources = vec![
        MemorySource::new("a", common::generate_records("a", 5)),
        std::sync::Arc::new(PanickingSource) as std::sync::Arc<dyn wordbank::ingest::Source>,
    ];

    let report = ingest(store, sources).await.unwrap();

    assert_eq!(report.units_ingested, 1);
    assert!(matches!(&report.skipped[0], SourceError::Task { unit, .. } if unit == "panicking"));
    assert_eq!(report.records_committed, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_withFailingWrite_shouldKeepEarlierCommitsAndStop() {
    let store = MockStore::failing_on("w1500");
    let state = store.state();

    let result = ingest(
        store,
        vec![MemorySource::new("all", common::generate_records("w", 2500))],
    )
    .await;

    match result {
        Err(IngestError::Write {
            source: WriteError::Resolve { word, .. },
            records_committed,
            records_processed,
        }) => {
            assert_eq!(word, "w1500");
            assert_eq!(records_committed, 1000);
            assert_eq!(records_processed, 1500);
        }
        other => panic!("Expected write error, got {:?}", other),
    }

    let state = state.lock().unwrap();
    assert_eq!(state.commit_sizes, vec![1000]);
    assert_eq!(state.rollbacks, 1);
    assert_eq!(state.committed.words.len(), 1000);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_withWriteFailureAndChunkedReaders_shouldNotHang() {
    let store = MockStore::failing_on("a3");
    let pipeline = Pipeline::new(PipelineOptions {
        commit_every: 10,
        chunk_size: Some(1),
    });
    let sources = (0..4)
        .map(|i| {
            let prefix = ["a", "b", "c", "d"][i];
            MemorySource::new(prefix, common::generate_records(prefix, 50))
        })
        .collect();

    let result = pipeline.run(store, sources).await;

    assert!(matches!(result, Err(IngestError::Write { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_withSchemaFailure_shouldNotWriteAnything() {
    let store = MockStore::failing_schema();
    let state = store.state();

    let result = ingest(store, vec![MemorySource::new("a", common::generate_records("a", 5))]).await;

    assert!(matches!(result, Err(IngestError::Schema(_))));
    assert_eq!(state.lock().unwrap().begins, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_withFailingPhraseInsert_shouldReportInsertErrorAfterLastCommit() {
    let store = MockStore::failing_phrase_of("w1200");
    let state = store.state();

    let result = ingest(
        store,
        vec![MemorySource::new("all", common::generate_records("w", 2500))],
    )
    .await;

    match result {
        Err(IngestError::Write {
            source: WriteError::Insert { table, word, .. },
            records_committed,
            records_processed,
        }) => {
            assert_eq!(table, "phrases");
            assert_eq!(word, "w1200");
            assert_eq!(records_committed, 1000);
            assert_eq!(records_processed, 1200);
        }
        other => panic!("Expected insert error, got {:?}", other),
    }

    let state = state.lock().unwrap();
    assert_eq!(state.commit_sizes, vec![1000]);
    assert_eq!(state.rollbacks, 1);
    assert!(!state.committed.words.contains_key("w1200"));
}
