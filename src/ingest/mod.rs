/*!
 * Concurrent ingestion of vocabulary files.
 *
 * Readers parse input units in parallel and send whole batches over a
 * bounded channel to a single writer, which persists them through a
 * `Store` in transactions of a fixed number of records.
 *
 * - `models`: records and batches
 * - `source`: the `Source` trait, JSON file source and reader task
 * - `store`: the `Store` trait and its SQLite implementation
 * - `writer`: the batch writer and its transaction state machine
 * - `pipeline`: the coordinator and run report
 */

pub mod models;
pub mod source;
pub mod store;
pub mod writer;
pub mod pipeline;

pub use models::{Batch, Phrase, Translation, WordRecord};
pub use pipeline::{ingest, IngestReport, Pipeline, PipelineOptions};
pub use source::{JsonFileSource, Source};
pub use store::{SqliteStore, Store};
pub use writer::{BatchWriter, WriteSummary, DEFAULT_COMMIT_EVERY};
