//! Arxiv-Trawler main entry point

use arxiv_trawler::config::load_config_with_hash;
use arxiv_trawler::storage::{JobStore, SqliteStore};
use arxiv_trawler::{start_crawl, CrawlEngine};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Arxiv-Trawler: a breadth-first arXiv citation crawler
///
/// Starts from a seed URL, follows citation/search/navigation links up to
/// the configured visit cap, and stores one archive per citation page with
/// its metadata and extracted PDF text.
#[derive(Parser, Debug)]
#[command(name = "arxiv-trawler")]
#[command(version = "1.0.0")]
#[command(about = "A breadth-first arXiv citation crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Seed URL to crawl from (absolute, or a path resolved against the
    /// configured base domain)
    #[arg(value_name = "SEED_URL", required_unless_present_any = ["jobs", "status", "archives"])]
    seed: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// List all jobs and exit
    #[arg(long, conflicts_with_all = ["status", "archives"])]
    jobs: bool,

    /// Show one job's status and exit
    #[arg(long, value_name = "JOB_ID", conflicts_with_all = ["jobs", "archives"])]
    status: Option<String>,

    /// List the archives of one job and exit
    #[arg(long, value_name = "JOB_ID", conflicts_with_all = ["jobs", "status"])]
    archives: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let store = Arc::new(SqliteStore::new(Path::new(&config.output.database_path))?);

    if cli.jobs {
        handle_jobs(store.as_ref())?;
    } else if let Some(job_id) = &cli.status {
        handle_status(store.as_ref(), job_id)?;
    } else if let Some(job_id) = &cli.archives {
        handle_archives(store.as_ref(), job_id)?;
    } else if let Some(seed) = cli.seed {
        handle_crawl(config, store, seed).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("arxiv_trawler=info,warn"),
            1 => EnvFilter::new("arxiv_trawler=debug,info"),
            2 => EnvFilter::new("arxiv_trawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --jobs mode: lists all jobs
fn handle_jobs(store: &dyn JobStore) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = store.list_jobs()?;
    if jobs.is_empty() {
        println!("No jobs found");
        return Ok(());
    }

    for job in jobs {
        println!(
            "{}  {:<9}  {}  {}",
            job.id,
            job.status.to_db_string(),
            job.created_at.to_rfc3339(),
            job.url
        );
    }
    Ok(())
}

/// Handles the --status mode: shows one job
fn handle_status(store: &dyn JobStore, job_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let job = store.get_job(job_id)?;
    println!("Job:     {}", job.id);
    println!("URL:     {}", job.url);
    println!("Status:  {}", job.status.to_db_string());
    if let Some(error) = &job.error {
        println!("Error:   {}", error);
    }
    println!("Created: {}", job.created_at.to_rfc3339());
    if let Some(updated) = job.updated_at {
        println!("Updated: {}", updated.to_rfc3339());
    }
    Ok(())
}

/// Handles the --archives mode: lists a job's archives
fn handle_archives(store: &dyn JobStore, job_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let archives = store.list_archives_by_job(job_id)?;
    println!("{} archive(s) for job {}\n", archives.len(), job_id);

    for archive in archives {
        println!("- {}", archive.title);
        println!("  url:       {}", archive.url);
        println!("  author:    {}", archive.author);
        if let Some(date) = archive.submitted_date {
            println!("  submitted: {}", date);
        }
        if !archive.subjects.is_empty() {
            println!("  subjects:  {}", archive.subjects.join("; "));
        }
        println!("  pdf:       {} ({} chars of text)", archive.pdf_url, archive.pdf_text.len());
    }
    Ok(())
}

/// Handles the main crawl operation: triggers a job and waits for it
async fn handle_crawl(
    config: arxiv_trawler::Config,
    store: Arc<SqliteStore>,
    seed: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Arc::new(CrawlEngine::new(config, store.clone())?);

    let handle = start_crawl(engine, seed)?;
    println!("Started job {}", handle.job_id);

    // The CLI has nothing else to do, so wait for the background task here;
    // other callers can poll the store instead.
    handle.task.await?;

    let job = store.get_job(&handle.job_id)?;
    let archives = store.list_archives_by_job(&handle.job_id)?;
    println!(
        "Job {} finished: {} ({} archives)",
        job.id,
        job.status.to_db_string(),
        archives.len()
    );
    if let Some(error) = &job.error {
        println!("Error: {}", error);
    }

    Ok(())
}
