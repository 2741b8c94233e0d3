//! Storage trait and error types

use crate::storage::{Archive, CrawlJob, JobStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job {id} already reached terminal status {status:?}")]
    TerminalJob { id: String, status: JobStatus },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for job/archive store backends
///
/// All operations are keyed by opaque string ids and must be atomic at
/// per-document granularity; no cross-document transactions are required.
/// Implementations must be shareable across concurrently running jobs.
pub trait JobStore: Send + Sync {
    /// Persists a freshly created crawl job
    fn create_job(&self, job: &CrawlJob) -> StorageResult<()>;

    /// Updates a job's status, optionally recording a failure detail
    ///
    /// Terminal states are absorbing: writing to a job that is already
    /// `Completed` or `Failed` is a [`StorageError::TerminalJob`].
    fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
        error: Option<&str>,
    ) -> StorageResult<()>;

    /// Gets a job by id
    fn get_job(&self, job_id: &str) -> StorageResult<CrawlJob>;

    /// Lists all jobs, newest first
    fn list_jobs(&self) -> StorageResult<Vec<CrawlJob>>;

    /// Persists one extracted archive
    fn create_archive(&self, archive: &Archive) -> StorageResult<()>;

    /// Lists all archives produced by a job, in creation order
    fn list_archives_by_job(&self, job_id: &str) -> StorageResult<Vec<Archive>>;
}
