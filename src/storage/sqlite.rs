//! SQLite implementation of the job/archive store

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{JobStore, StorageError, StorageResult};
use crate::storage::{Archive, ClassifiedLinks, CrawlJob, JobStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed store
///
/// Wraps a single connection behind a mutex; every trait operation is one
/// statement, which gives the per-document write atomicity the engine needs.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at the given path
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn job_from_row(row: &Row<'_>) -> rusqlite::Result<CrawlJob> {
        let status_str: String = row.get(2)?;
        let created_at: String = row.get(4)?;
        let updated_at: Option<String> = row.get(5)?;

        Ok(CrawlJob {
            id: row.get(0)?,
            url: row.get(1)?,
            status: JobStatus::from_db_string(&status_str).unwrap_or(JobStatus::Failed),
            error: row.get(3)?,
            created_at: parse_timestamp(&created_at),
            updated_at: updated_at.as_deref().map(parse_timestamp),
        })
    }

    fn archive_from_row(row: &Row<'_>) -> rusqlite::Result<Archive> {
        let links_json: String = row.get(5)?;
        let subjects_json: String = row.get(11)?;
        let submitted: Option<String> = row.get(10)?;
        let created_at: String = row.get(12)?;
        let updated_at: String = row.get(13)?;

        Ok(Archive {
            id: row.get(0)?,
            job_id: row.get(1)?,
            url: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            extracted_links: serde_json::from_str::<ClassifiedLinks>(&links_json)
                .unwrap_or_default(),
            pdf_text: row.get(6)?,
            pdf_url: row.get(7)?,
            author: row.get(8)?,
            authors: row.get(9)?,
            submitted_date: submitted
                .as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
            subjects: serde_json::from_str(&subjects_json).unwrap_or_default(),
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

const JOB_COLUMNS: &str = "id, url, status, error, created_at, updated_at";
const ARCHIVE_COLUMNS: &str = "id, job_id, url, title, description, extracted_links, pdf_text, \
                               pdf_url, author, authors, submitted_date, subjects, created_at, updated_at";

impl JobStore for SqliteStore {
    fn create_job(&self, job: &CrawlJob) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO crawl_jobs (id, url, status, error, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                job.id,
                job.url,
                job.status.to_db_string(),
                job.error,
                job.created_at.to_rfc3339(),
                job.updated_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
        error: Option<&str>,
    ) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();

        // Terminal states are absorbing; the WHERE clause makes the guard
        // atomic with the write.
        let rows = conn.execute(
            "UPDATE crawl_jobs SET status = ?1, error = ?2, updated_at = ?3
             WHERE id = ?4 AND status NOT IN ('completed', 'failed')",
            params![
                status.to_db_string(),
                error,
                Utc::now().to_rfc3339(),
                job_id
            ],
        )?;

        if rows == 0 {
            let current: Option<String> = conn
                .query_row(
                    "SELECT status FROM crawl_jobs WHERE id = ?1",
                    params![job_id],
                    |row| row.get(0),
                )
                .optional()?;

            return match current {
                Some(status_str) => Err(StorageError::TerminalJob {
                    id: job_id.to_string(),
                    status: JobStatus::from_db_string(&status_str).unwrap_or(JobStatus::Failed),
                }),
                None => Err(StorageError::JobNotFound(job_id.to_string())),
            };
        }

        Ok(())
    }

    fn get_job(&self, job_id: &str) -> StorageResult<CrawlJob> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {JOB_COLUMNS} FROM crawl_jobs WHERE id = ?1"),
            params![job_id],
            Self::job_from_row,
        )
        .optional()?
        .ok_or_else(|| StorageError::JobNotFound(job_id.to_string()))
    }

    fn list_jobs(&self) -> StorageResult<Vec<CrawlJob>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM crawl_jobs ORDER BY created_at DESC, rowid DESC"
        ))?;
        let jobs = stmt
            .query_map([], Self::job_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    fn create_archive(&self, archive: &Archive) -> StorageResult<()> {
        let links_json = serde_json::to_string(&archive.extracted_links)?;
        let subjects_json = serde_json::to_string(&archive.subjects)?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO archives ({ARCHIVE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            ),
            params![
                archive.id,
                archive.job_id,
                archive.url,
                archive.title,
                archive.description,
                links_json,
                archive.pdf_text,
                archive.pdf_url,
                archive.author,
                archive.authors,
                archive.submitted_date.map(|d| d.format("%Y-%m-%d").to_string()),
                subjects_json,
                archive.created_at.to_rfc3339(),
                archive.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn list_archives_by_job(&self, job_id: &str) -> StorageResult<Vec<Archive>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARCHIVE_COLUMNS} FROM archives WHERE job_id = ?1 ORDER BY rowid"
        ))?;
        let archives = stmt
            .query_map(params![job_id], Self::archive_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(archives)
    }
}
