//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier
//! - Checking robots.txt once per host
//! - Running fetch-and-dispatch tasks on a worker pool
//! - Feeding discovered entries back to the scheduler
//! - Handing records to the output sinks
//! - Stopping on cancellation while draining in-flight tasks

use crate::config::{load_config_with_hash, Config};
use crate::crawler::dispatch::{process_document, CrawlMode, PageOutcome};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult, RetryPolicy};
use crate::crawler::scheduler::{QueuedEntry, Scheduler};
use crate::frontier::{seed_frontier, FrontierEntry};
use crate::output::{JsonLinesSink, RecordSink, SqliteSink};
use crate::records::Record;
use crate::robots::{fetch_robots, RobotsPolicy};
use crate::storage::{FailureRecord, RunStatus, SqliteStorage, Storage, StorageError};
use crate::CrawlerError;
use reqwest::Client;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub pages_fetched: u64,
    pub pages_failed: u64,
    pub pages_disallowed: u64,
    pub games: u64,
    pub reviews: u64,
    pub cancelled: bool,
}

/// Result of one fetch-and-dispatch task
struct TaskOutput {
    queued: QueuedEntry,
    result: Result<PageOutcome, FetchResult>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    mode: CrawlMode,
    scheduler: Scheduler,
    client: Client,
    sinks: Vec<Box<dyn RecordSink + Send>>,
    storage: Option<Arc<Mutex<SqliteStorage>>>,
    run_id: Option<i64>,
    robots: HashMap<String, RobotsPolicy>,
    cancel: CancellationToken,
    report: CrawlReport,
}

impl Coordinator {
    /// Creates a coordinator writing to the database and, when configured,
    /// JSON-lines files
    pub fn new(config: Config, config_hash: &str, mode: CrawlMode) -> Result<Self, CrawlerError> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let storage = Arc::new(Mutex::new(storage));

        let run_id = lock_storage(&storage)?.create_run(config_hash, mode.as_str())?;
        tracing::info!(run_id, mode = %mode, "Created crawl run");

        let mut sinks: Vec<Box<dyn RecordSink + Send>> =
            vec![Box::new(SqliteSink::new(Arc::clone(&storage), run_id))];

        if let Some(dir) = &config.output.jsonl_dir {
            sinks.push(Box::new(JsonLinesSink::open(Path::new(dir))?));
        }

        let mut coordinator = Self::with_sinks(config, mode, sinks)?;
        coordinator.storage = Some(storage);
        coordinator.run_id = Some(run_id);
        Ok(coordinator)
    }

    /// Creates a coordinator with caller-provided sinks and no database
    pub fn with_sinks(
        config: Config,
        mode: CrawlMode,
        sinks: Vec<Box<dyn RecordSink + Send>>,
    ) -> Result<Self, CrawlerError> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout)?;
        let scheduler = Scheduler::new(&config.crawler, config.catalog.allowed_domains.clone());

        Ok(Self {
            config: Arc::new(config),
            mode,
            scheduler,
            client,
            sinks,
            storage: None,
            run_id: None,
            robots: HashMap::new(),
            cancel: CancellationToken::new(),
            report: CrawlReport::default(),
        })
    }

    /// Token that stops the crawl when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Seeds the frontier from the catalog configuration
    pub fn seed(&mut self) -> Result<usize, CrawlerError> {
        let catalog = &self.config.catalog;
        let seeds = seed_frontier(&catalog.base_url, &catalog.platforms)?;
        let total = seeds.len();
        let accepted = self.scheduler.enqueue_all(seeds);
        tracing::info!(seeds = total, accepted, "Seeded frontier");
        Ok(accepted)
    }

    /// Adds entries to the frontier directly
    pub fn enqueue(&mut self, entries: impl IntoIterator<Item = FrontierEntry>) -> usize {
        self.scheduler.enqueue_all(entries)
    }

    /// Runs the crawl until the frontier is exhausted or the run is cancelled
    pub async fn run(mut self) -> Result<CrawlReport, CrawlerError> {
        let start_time = Instant::now();
        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();

        tracing::info!(frontier = self.scheduler.frontier_size(), "Starting crawl");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            if self.scheduler.is_empty() {
                if tasks.is_empty() {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
                tokio::select! {
                    Some(joined) = tasks.join_next() => self.handle_joined(joined),
                    _ = self.cancel.cancelled() => break,
                }
                continue;
            }

            tokio::select! {
                scheduled = self.scheduler.next_entry() => {
                    if let Some(scheduled) = scheduled {
                        self.spawn_fetch(&mut tasks, scheduled.queued, scheduled.permit).await;
                    }
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => self.handle_joined(joined),
                _ = self.cancel.cancelled() => break,
            }
        }

        if self.cancel.is_cancelled() {
            self.report.cancelled = true;
            tracing::warn!(in_flight = tasks.len(), "Crawl cancelled, draining in-flight pages");
        }

        while let Some(joined) = tasks.join_next().await {
            self.handle_joined(joined);
        }

        self.finish_sinks();
        self.finish_run()?;

        tracing::info!(
            pages = self.report.pages_fetched,
            failed = self.report.pages_failed,
            games = self.report.games,
            reviews = self.report.reviews,
            "Crawl finished in {:?}",
            start_time.elapsed()
        );

        Ok(self.report)
    }

    /// Checks robots.txt and spawns the fetch task for one entry
    async fn spawn_fetch(
        &mut self,
        tasks: &mut JoinSet<TaskOutput>,
        queued: QueuedEntry,
        permit: tokio::sync::OwnedSemaphorePermit,
    ) {
        if self.config.crawler.respect_robots && !self.robots_allows(&queued).await {
            tracing::info!(url = %queued.entry.url(), "Disallowed by robots.txt");
            self.report.pages_disallowed += 1;
            return;
        }

        let client = self.client.clone();
        let retry = RetryPolicy::from(&self.config.crawler);
        let mode = self.mode;

        tasks.spawn(async move {
            let _permit = permit;
            let fetched = fetch_url(&client, queued.entry.url(), retry).await;
            let result = match fetched {
                FetchResult::Success { final_url, body, .. } => {
                    Ok(process_document(&queued.entry, &final_url, &body, mode))
                }
                failure => Err(failure),
            };
            TaskOutput { queued, result }
        });
    }

    async fn robots_allows(&mut self, queued: &QueuedEntry) -> bool {
        if !self.robots.contains_key(&queued.host) {
            let agent = &self.config.user_agent.crawler_name;
            let policy = fetch_robots(&self.client, queued.entry.url(), agent).await;
            self.scheduler.set_crawl_delay(&queued.host, policy.crawl_delay());
            self.robots.insert(queued.host.clone(), policy);
        }

        self.robots
            .get(&queued.host)
            .map_or(true, |policy| policy.allows(queued.entry.url()))
    }

    fn handle_joined(&mut self, joined: Result<TaskOutput, JoinError>) {
        let output = match joined {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Fetch task failed: {}", e);
                self.report.pages_failed += 1;
                return;
            }
        };

        match output.result {
            Ok(outcome) => {
                self.report.pages_fetched += 1;
                if self.report.pages_fetched % 50 == 0 {
                    tracing::info!(
                        "Progress: {} pages fetched, {} in frontier, {} games, {} reviews",
                        self.report.pages_fetched,
                        self.scheduler.frontier_size(),
                        self.report.games,
                        self.report.reviews
                    );
                }
                let discovered = outcome.entries.len();
                let accepted = self.scheduler.enqueue_all(outcome.entries);
                tracing::debug!(
                    url = %output.queued.entry.url(),
                    discovered,
                    accepted,
                    records = outcome.records.len(),
                    "Processed page"
                );
                for record in &outcome.records {
                    self.emit(record);
                }
            }
            Err(failure) => self.record_failure(&output.queued, &failure),
        }
    }

    fn emit(&mut self, record: &Record) {
        match record {
            Record::Game(_) => self.report.games += 1,
            Record::Review(_) => self.report.reviews += 1,
        }

        for sink in &mut self.sinks {
            if let Err(e) = sink.emit(record) {
                tracing::error!(
                    sink = sink.name(),
                    title_safe = record.title_safe(),
                    "Failed to write record: {}",
                    e
                );
            }
        }
    }

    fn record_failure(&mut self, queued: &QueuedEntry, failure: &FetchResult) {
        self.report.pages_failed += 1;

        if failure.is_rate_limited() {
            self.scheduler.mark_rate_limited(&queued.host);
        }

        let (status_code, error_message) = match failure {
            FetchResult::HttpError { status_code } => (Some(*status_code), None),
            FetchResult::NetworkError { error } => (None, Some(error.clone())),
            FetchResult::ContentMismatch { content_type } => {
                (None, Some(format!("Expected HTML, got {}", content_type)))
            }
            FetchResult::Success { .. } => (None, None),
        };

        tracing::error!(
            url = %queued.entry.url(),
            kind = %queued.entry.kind(),
            failure = failure.kind(),
            status = status_code,
            "Fetch failed: {}",
            error_message.as_deref().unwrap_or("")
        );

        let (Some(storage), Some(run_id)) = (&self.storage, self.run_id) else {
            return;
        };

        let record = FailureRecord {
            url: queued.entry.url().to_string(),
            entry_kind: queued.entry.kind().as_str().to_string(),
            failure_kind: failure.kind().to_string(),
            status_code,
            error_message,
        };

        let stored = lock_storage(storage).and_then(|mut s| Ok(s.record_failure(run_id, &record)?));
        if let Err(e) = stored {
            tracing::error!("Failed to store fetch failure: {}", e);
        }
    }

    fn finish_sinks(&mut self) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.finish() {
                tracing::error!(sink = sink.name(), "Failed to finish output: {}", e);
            }
        }
    }

    fn finish_run(&mut self) -> Result<(), CrawlerError> {
        let (Some(storage), Some(run_id)) = (&self.storage, self.run_id) else {
            return Ok(());
        };

        let status = if self.report.cancelled {
            RunStatus::Interrupted
        } else {
            RunStatus::Completed
        };

        lock_storage(storage)?.finish_run(run_id, status)?;
        tracing::info!(run_id, status = status.to_db_string(), "Run recorded");
        Ok(())
    }
}

fn lock_storage(
    storage: &Mutex<SqliteStorage>,
) -> Result<std::sync::MutexGuard<'_, SqliteStorage>, CrawlerError> {
    storage
        .lock()
        .map_err(|_| CrawlerError::Storage(StorageError::LockPoisoned))
}

/// Runs a complete crawl from the seeds of a configuration file
///
/// Callers wanting Ctrl-C handling build a [`Coordinator`] themselves and
/// wire [`Coordinator::cancellation_token`].
///
/// # Example
///
/// ```no_run
/// use game_crawler::crawler::run_crawl;
/// use game_crawler::CrawlMode;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Path::new("gamecrawler.toml"), CrawlMode::Full).await?;
/// println!("{} games", report.games);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config_path: &Path, mode: CrawlMode) -> Result<CrawlReport, CrawlerError> {
    let (config, config_hash) = load_config_with_hash(config_path)?;
    let mut coordinator = Coordinator::new(config, &config_hash, mode)?;
    coordinator.seed()?;
    coordinator.run().await
}
