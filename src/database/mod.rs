/*!
 * SQLite persistence for ingested vocabulary.
 *
 * - `schema`: table definitions and idempotent creation
 * - `connection`: connection setup, pragmas and guarded access
 * - `repository`: get-or-create of words and child row inserts
 * - `models`: journal mode setting and table statistics
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{DatabaseStats, JournalMode};
pub use repository::Resolution;
