//! Database schema definitions

use rusqlite::Connection;

/// SQL schema for the job/archive database
pub const SCHEMA_SQL: &str = r#"
-- One row per crawl invocation
CREATE TABLE IF NOT EXISTS crawl_jobs (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    status TEXT NOT NULL,
    error TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_jobs_status ON crawl_jobs(status);

-- One row per processed citation page
CREATE TABLE IF NOT EXISTS archives (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL REFERENCES crawl_jobs(id),
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    extracted_links TEXT NOT NULL,
    pdf_text TEXT NOT NULL,
    pdf_url TEXT NOT NULL,
    author TEXT NOT NULL,
    authors TEXT NOT NULL,
    submitted_date TEXT,
    subjects TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_archives_job ON archives(job_id);
"#;

/// Initializes the database schema on a connection
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
