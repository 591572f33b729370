//! Crawler coordinator - main crawl orchestration logic
//!
//! This module owns the shared pieces of a batch and drives every URL
//! through its lifecycle:
//! - Parsing the target and looking up its domain policy
//! - Fetching under the policy's slot, retrying transient failures
//! - Applying extracted fields or the skip outcome to the aggregator
//! - Counting outstanding work so the report waits for every URL

use crate::config::Config;
use crate::crawler::classifier::{classify_failure, FetchFailure, Verdict};
use crate::crawler::extractor::extract_fields;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::scheduler::Scheduler;
use crate::output::{order_by_input, CrawlStatistics};
use crate::state::{Aggregator, CompletionTracker, ResolvedRecord, SkipReason};
use crate::url::{extract_domain, parse_target};
use crate::ScrapeError;
use chrono::Utc;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often `wait` logs progress while URLs are outstanding
const PROGRESS_INTERVAL: Duration = Duration::from_secs(30);

/// Everything a URL task needs, shared between all tasks of a batch
struct FetchContext {
    config: Config,
    client: Client,
    scheduler: Scheduler,
    store: Arc<Aggregator>,
    tracker: Arc<CompletionTracker>,
    submitted: AtomicUsize,
    retries: AtomicU64,
}

/// Outcome of a finished batch
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// One row per distinct URL, ordered by first appearance in the input
    pub rows: Vec<ResolvedRecord>,

    /// Counters for the finished batch
    pub stats: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    ctx: Arc<FetchContext>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and the per-policy slots. The aggregator and
    /// completion tracker are created fresh for this batch.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to accept URLs
    /// * `Err(ScrapeError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        Self::with_store(config, Arc::new(Aggregator::new()))
    }

    /// Creates a coordinator that writes into an existing aggregator
    pub fn with_store(config: Config, store: Arc<Aggregator>) -> Result<Self, ScrapeError> {
        let client = build_http_client(&config)?;
        let scheduler = Scheduler::new(&config.domains);

        tracing::debug!(
            "Coordinator ready: {} domain policies, {} max attempts",
            config.domains.len(),
            config.crawler.max_attempts
        );

        Ok(Self {
            ctx: Arc::new(FetchContext {
                config,
                client,
                scheduler,
                store,
                tracker: Arc::new(CompletionTracker::new()),
                submitted: AtomicUsize::new(0),
                retries: AtomicU64::new(0),
            }),
        })
    }

    /// The aggregator receiving this batch's results
    pub fn store(&self) -> &Arc<Aggregator> {
        &self.ctx.store
    }

    /// The tracker counting this batch's outstanding requests
    pub fn tracker(&self) -> &Arc<CompletionTracker> {
        &self.ctx.tracker
    }

    /// Dispatches one URL
    ///
    /// The request is counted before the task is spawned, so a `wait` that
    /// starts right after `submit` cannot miss it. Must be called from within
    /// a tokio runtime.
    pub fn submit(&self, raw_url: &str) {
        let raw = raw_url.trim().to_string();
        self.ctx.submitted.fetch_add(1, Ordering::Relaxed);
        self.ctx.tracker.dispatch();

        let ctx = Arc::clone(&self.ctx);
        tokio::spawn(async move { process_url(ctx, raw).await });
    }

    /// Blocks until every submitted URL (retries included) is terminal
    ///
    /// Logs progress every 30 seconds while waiting.
    pub async fn wait(&self) {
        let done = self.ctx.tracker.wait();
        tokio::pin!(done);

        let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut done => break,
                _ = ticker.tick() => {
                    tracing::info!(
                        "Progress: {} of {} URLs resolved, {} requests outstanding, {} retries",
                        self.ctx.store.terminal_count(),
                        self.ctx.submitted.load(Ordering::Relaxed),
                        self.ctx.tracker.outstanding(),
                        self.ctx.retries.load(Ordering::Relaxed)
                    );
                }
            }
        }
    }

    /// Runs a complete batch
    ///
    /// Submits every URL, waits for all of them to resolve, and returns the
    /// report rows in input order with the batch statistics.
    pub async fn run(&self, urls: &[String]) -> CrawlReport {
        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!("Start with {} URLs", urls.len());

        for url in urls {
            self.submit(url);
        }
        self.wait().await;

        let records = self.ctx.store.records();
        let stats = CrawlStatistics::from_records(
            &records,
            urls.len(),
            self.ctx.tracker.dispatched(),
            self.ctx.retries.load(Ordering::Relaxed),
            started_at,
            Utc::now(),
            start_time.elapsed(),
        );

        tracing::info!(
            "Crawl completed: {} URLs resolved in {:?}",
            records.len(),
            start_time.elapsed()
        );

        CrawlReport {
            rows: order_by_input(self.ctx.store.snapshot(), urls),
            stats,
        }
    }
}

/// Drives one URL from its first attempt to a terminal outcome
///
/// Each loop iteration is one dispatched request. A retry dispatches the
/// next attempt before resolving the failed one.
async fn process_url(ctx: Arc<FetchContext>, raw: String) {
    let url = match parse_target(&raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Skipping malformed URL '{}': {}", raw, e);
            // No host to speak of; the classifier turns this into InvalidUrl
            let verdict = classify_failure("", &FetchFailure::transport(e.to_string()));
            let reason = match verdict {
                Verdict::Skip(reason) => reason,
                Verdict::Retry => SkipReason::InvalidUrl,
            };
            ctx.store.apply_skip(&raw, reason);
            ctx.tracker.resolve();
            return;
        }
    };

    let domain = extract_domain(&url).unwrap_or_default();
    let max_attempts = ctx.config.crawler.max_attempts;
    let mut attempt = 1;

    loop {
        let slot = ctx.scheduler.acquire(&domain).await;
        tracing::debug!("Fetching {} (attempt {}/{})", raw, attempt, max_attempts);

        let result = fetch_url(&ctx.client, &url).await;

        // The pause keeps the policy slot busy but not this task
        tokio::spawn(slot.finish());

        let failure = match result {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!("Fetched {} -> {} (HTTP {})", raw, final_url, status_code);
                let events = extract_fields(&body, &raw);
                for event in &events {
                    ctx.store.apply_field(&event.url, event.field, &event.value);
                }
                ctx.store.mark_scraped(&raw);
                ctx.tracker.resolve();
                return;
            }
            FetchResult::Failure(failure) => failure,
        };

        match classify_failure(&domain, &failure) {
            Verdict::Skip(reason) => {
                tracing::info!("Skipping {}: {}", raw, reason);
                ctx.store.apply_skip(&raw, reason);
                ctx.tracker.resolve();
                return;
            }
            Verdict::Retry if attempt >= max_attempts => {
                tracing::warn!(
                    "Giving up on {} after {} attempts: {}",
                    raw,
                    attempt,
                    failure.error
                );
                ctx.store.apply_skip(&raw, SkipReason::RetryExhausted);
                ctx.tracker.resolve();
                return;
            }
            Verdict::Retry => {
                let backoff = ctx.config.crawler.backoff_for(attempt);
                tracing::warn!(
                    "Error on {} (attempt {}/{}), retrying in {:?}: {}",
                    raw,
                    attempt,
                    max_attempts,
                    backoff,
                    failure.error
                );
                tokio::time::sleep(backoff).await;

                ctx.retries.fetch_add(1, Ordering::Relaxed);
                ctx.tracker.dispatch();
                ctx.tracker.resolve();
                attempt += 1;
            }
        }
    }
}

/// Runs the main crawl operation
///
/// Builds a coordinator for `config`, crawls `urls`, and returns the report
/// once every URL has resolved.
///
/// # Example
///
/// ```no_run
/// use semi_scrape::config::Config;
/// use semi_scrape::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let urls = vec!["https://www.nvidia.com/".to_string()];
/// let report = run_crawl(Config::default(), &urls).await?;
/// println!("{} rows", report.rows.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, urls: &[String]) -> Result<CrawlReport, ScrapeError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run(urls).await)
}
