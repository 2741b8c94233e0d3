//! Storage module for crawl jobs and extracted archives
//!
//! The `JobStore` trait is the crawl engine's only view of persistence;
//! backends are SQLite for real runs and an in-memory store for tests.

mod memory;
mod records;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use records::{Archive, ClassifiedLinks, CrawlJob, JobStatus};
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStore;
pub use traits::{JobStore, StorageError, StorageResult};
