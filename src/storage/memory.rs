//! In-memory implementation of the job/archive store
//!
//! Used by engine tests and anywhere a durable database is unnecessary.
//! Follows the same contract as the SQLite backend, including the
//! absorbing-terminal-status guard.

use crate::storage::traits::{JobStore, StorageError, StorageResult};
use crate::storage::{Archive, CrawlJob, JobStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    jobs: HashMap<String, CrawlJob>,
    // Creation order, newest ids pushed last
    job_order: Vec<String>,
    archives: Vec<Archive>,
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of archives held, across all jobs
    pub fn archive_count(&self) -> usize {
        self.inner.lock().unwrap().archives.len()
    }
}

impl JobStore for MemoryStore {
    fn create_job(&self, job: &CrawlJob) -> StorageResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.jobs.contains_key(&job.id) {
            return Err(StorageError::Database(format!(
                "duplicate job id {}",
                job.id
            )));
        }
        inner.job_order.push(job.id.clone());
        inner.jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
        error: Option<&str>,
    ) -> StorageResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let job = inner
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| StorageError::JobNotFound(job_id.to_string()))?;

        if job.status.is_terminal() {
            return Err(StorageError::TerminalJob {
                id: job_id.to_string(),
                status: job.status,
            });
        }

        job.status = status;
        job.error = error.map(str::to_string);
        job.updated_at = Some(Utc::now());
        Ok(())
    }

    fn get_job(&self, job_id: &str) -> StorageResult<CrawlJob> {
        self.inner
            .lock()
            .unwrap()
            .jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| StorageError::JobNotFound(job_id.to_string()))
    }

    fn list_jobs(&self) -> StorageResult<Vec<CrawlJob>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .job_order
            .iter()
            .rev()
            .filter_map(|id| inner.jobs.get(id).cloned())
            .collect())
    }

    fn create_archive(&self, archive: &Archive) -> StorageResult<()> {
        self.inner.lock().unwrap().archives.push(archive.clone());
        Ok(())
    }

    fn list_archives_by_job(&self, job_id: &str) -> StorageResult<Vec<Archive>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .archives
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }
}
