/*!
 * # wordbank - concurrent vocabulary ingestion into SQLite
 *
 * A Rust library that loads vocabulary files (words with their
 * translations and phrases) into a SQLite database.
 *
 * ## Features
 *
 * - Parse many input files in parallel, one reader task per file
 * - Persist through a single writer, so word lookups never race
 * - Get-or-create of words; duplicate translations and phrases are ignored
 * - Commit every N words regardless of file boundaries
 * - Skip unreadable or malformed files without aborting the run
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `ingest`: readers, writer and the pipeline coordinator
 *   - `ingest::source`: the `Source` trait and JSON file source
 *   - `ingest::store`: the `Store` trait and its SQLite implementation
 *   - `ingest::writer`: batched transactional writes
 *   - `ingest::pipeline`: fan-in coordination and run report
 * - `database`: schema, connection and row-level operations
 * - `app_config`: Configuration management
 * - `file_utils`: Input file discovery
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// Test names follow test_subject_withCondition_shouldOutcome
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod ingest;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{DatabaseConnection, DatabaseStats};
pub use errors::{IngestError, SchemaError, SourceError, WriteError};
pub use ingest::{ingest, IngestReport, JsonFileSource, Pipeline, PipelineOptions, SqliteStore};
