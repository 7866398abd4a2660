//! Scheduler for managing the crawl frontier and rate limiting
//!
//! This module handles:
//! - Priority queue management for frontier entries
//! - Deduplication on normalized URLs
//! - The allowed-domain filter
//! - Global concurrency limiting via semaphores
//! - Per-host minimum delays, robots.txt crawl delays and 429 back-off

use crate::config::CrawlerConfig;
use crate::frontier::{EntryKind, FrontierEntry};
use crate::state::HostState;
use crate::url::{extract_domain, is_allowed_host, normalize_url};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A frontier entry queued for fetching with priority information
#[derive(Debug, Clone)]
pub struct QueuedEntry {
    pub entry: FrontierEntry,

    /// Lowercased host of the entry's URL
    pub host: String,

    /// Priority value (lower is higher priority)
    pub priority: u32,

    /// Insertion sequence, keeps one priority class FIFO
    seq: u64,
}

/// Detail and review pages are drained before more listing pages are opened,
/// which keeps the frontier from growing faster than it is consumed.
pub fn priority_for(kind: EntryKind) -> u32 {
    match kind {
        EntryKind::Detail | EntryKind::ReviewIndex => 0,
        EntryKind::Listing => 10,
    }
}

// Lower priority values and lower sequence numbers are popped first
impl Ord for QueuedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for QueuedEntry {}

/// A scheduled fetch with a semaphore permit
pub struct ScheduledFetch {
    pub queued: QueuedEntry,

    /// Released when the fetch task finishes
    pub permit: OwnedSemaphorePermit,
}

/// Why an entry was not added to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Duplicate,
    DisallowedDomain,
    InvalidUrl,
}

/// Scheduler manages the frontier queue and rate limiting
///
/// The scheduler coordinates:
/// - Global concurrency limits (max concurrent pages open)
/// - Per-host rate limits (minimum time between requests)
/// - Priority-based entry selection from the frontier
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// Per-host state tracking
    host_states: HashMap<String, HostState>,

    /// Frontier priority queue
    frontier: BinaryHeap<QueuedEntry>,

    /// Normalized URLs ever enqueued in this run
    seen: HashSet<String>,

    /// Domain patterns entries must match
    allowed_domains: Vec<String>,

    minimum_delay: Duration,
    next_seq: u64,
}

impl Scheduler {
    /// Creates a new scheduler with an empty frontier
    pub fn new(config: &CrawlerConfig, allowed_domains: Vec<String>) -> Self {
        Self {
            global_semaphore: Arc::new(Semaphore::new(config.max_concurrent_pages_open as usize)),
            host_states: HashMap::new(),
            frontier: BinaryHeap::new(),
            seen: HashSet::new(),
            allowed_domains,
            minimum_delay: Duration::from_millis(config.minimum_time_on_page),
            next_seq: 0,
        }
    }

    /// Adds an entry to the frontier
    ///
    /// Entries whose URL was already enqueued (after normalization) or whose
    /// host is outside the allowed domains are dropped.
    pub fn enqueue(&mut self, entry: FrontierEntry) -> Result<(), Rejection> {
        let normalized = normalize_url(entry.url().as_str()).map_err(|e| {
            tracing::debug!(url = %entry.url(), error = %e, "Dropping invalid URL");
            Rejection::InvalidUrl
        })?;

        let host = extract_domain(&normalized).ok_or(Rejection::InvalidUrl)?;

        if !is_allowed_host(&host, &self.allowed_domains) {
            tracing::debug!(url = %entry.url(), "Dropping URL outside allowed domains");
            return Err(Rejection::DisallowedDomain);
        }

        if !self.seen.insert(normalized.to_string()) {
            tracing::trace!(url = %entry.url(), "Already seen");
            return Err(Rejection::Duplicate);
        }

        let priority = priority_for(entry.kind());
        let seq = self.next_seq;
        self.next_seq += 1;

        self.frontier.push(QueuedEntry {
            entry,
            host,
            priority,
            seq,
        });
        Ok(())
    }

    /// Adds many entries, returning how many were accepted
    pub fn enqueue_all(&mut self, entries: impl IntoIterator<Item = FrontierEntry>) -> usize {
        entries
            .into_iter()
            .filter(|entry| self.enqueue(entry.clone()).is_ok())
            .count()
    }

    /// Gets the next entry whose host is ready
    ///
    /// Waits for a global semaphore permit first, then for the host with the
    /// shortest remaining delay. Returns None once the frontier is empty.
    pub async fn next_entry(&mut self) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = self.global_semaphore.clone().acquire_owned().await.ok()?;

        loop {
            let now = Instant::now();
            let mut not_ready = Vec::new();
            let mut found = None;

            while let Some(queued) = self.frontier.pop() {
                let ready = self
                    .host_states
                    .get(&queued.host)
                    .map_or(true, |state| state.can_request(self.minimum_delay, now));

                if ready {
                    found = Some(queued);
                    break;
                }
                not_ready.push(queued);
            }

            self.frontier.extend(not_ready);

            if let Some(queued) = found {
                self.record_request(&queued.host, now);
                tracing::debug!(url = %queued.entry.url(), kind = %queued.entry.kind(), "Scheduling");
                return Some(ScheduledFetch { queued, permit });
            }

            let wait = self.minimum_wait_time(now);
            tracing::trace!(
                "No host ready, waiting {:?}. Frontier size: {}",
                wait,
                self.frontier.len()
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Shortest time until any host with queued entries becomes ready
    fn minimum_wait_time(&self, now: Instant) -> Duration {
        self.frontier
            .iter()
            .filter_map(|queued| {
                self.host_states
                    .get(&queued.host)
                    .and_then(|state| state.time_until_next_request(self.minimum_delay, now))
            })
            .min()
            .unwrap_or(Duration::ZERO)
            + Duration::from_millis(10)
    }

    fn record_request(&mut self, host: &str, now: Instant) {
        self.host_states
            .entry(host.to_string())
            .or_default()
            .record_request(now);
    }

    /// Backs a host off after HTTP 429
    pub fn mark_rate_limited(&mut self, host: &str) {
        tracing::warn!(host, "Host rate limited, backing off");
        self.host_states
            .entry(host.to_string())
            .or_default()
            .mark_rate_limited(Instant::now());
    }

    /// Applies a robots.txt crawl delay to a host
    pub fn set_crawl_delay(&mut self, host: &str, delay: Option<Duration>) {
        self.host_states.entry(host.to_string()).or_default().crawl_delay = delay;
    }

    pub fn host_state(&self, host: &str) -> Option<&HostState> {
        self.host_states.get(host)
    }

    /// Returns the number of entries in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }
}
