//! Statistics for a finished crawl batch
//!
//! This module summarizes the aggregated records into counters for the
//! completion log and the console summary.

use crate::state::{Field, Record, SkipReason};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Lines in the URL list, duplicates included
    pub total_urls: usize,

    /// Distinct URLs with a record
    pub distinct_urls: usize,

    /// Records completed by a successful fetch
    pub scraped: u64,

    /// Skips by HTTP status code
    pub skipped_by_status: BTreeMap<u16, u64>,

    /// Skips because the host did not resolve
    pub no_such_host: u64,

    /// Skips because the input line was not a usable URL
    pub invalid_url: u64,

    /// Skips because every attempt failed with a retryable error
    pub retry_exhausted: u64,

    /// Scraped records missing each field
    pub missing_fields: BTreeMap<String, u64>,

    /// Requests dispatched, retries included
    pub attempts: u64,

    /// Retries dispatched
    pub retries: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Builds statistics from the final records of a batch
    pub fn from_records(
        records: &[Record],
        total_urls: usize,
        attempts: u64,
        retries: u64,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        let mut stats = Self {
            total_urls,
            distinct_urls: records.len(),
            scraped: 0,
            skipped_by_status: BTreeMap::new(),
            no_such_host: 0,
            invalid_url: 0,
            retry_exhausted: 0,
            missing_fields: BTreeMap::new(),
            attempts,
            retries,
            started_at,
            finished_at,
            elapsed,
        };

        for record in records {
            match &record.skip {
                Some(SkipReason::Status(code)) => {
                    *stats.skipped_by_status.entry(*code).or_insert(0) += 1;
                }
                Some(SkipReason::NoSuchHost) => stats.no_such_host += 1,
                Some(SkipReason::InvalidUrl) => stats.invalid_url += 1,
                Some(SkipReason::RetryExhausted) => stats.retry_exhausted += 1,
                None => {
                    stats.scraped += 1;
                    for field in Field::ALL {
                        if record.field(field).map_or(true, str::is_empty) {
                            *stats.missing_fields.entry(field.to_string()).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        stats
    }

    /// Total skipped records across all reasons
    pub fn skipped(&self) -> u64 {
        self.skipped_by_status.values().sum::<u64>()
            + self.no_such_host
            + self.invalid_url
            + self.retry_exhausted
    }

    /// Share of distinct URLs that were scraped, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.distinct_urls == 0 {
            return 0.0;
        }
        (self.scraped as f64 / self.distinct_urls as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  URLs in list: {}", stats.total_urls);
    println!("  Distinct URLs: {}", stats.distinct_urls);
    println!(
        "  Scraped: {} ({:.1}%)",
        stats.scraped,
        stats.success_rate()
    );
    println!("  Skipped: {}", stats.skipped());
    println!("  Requests: {} ({} retries)", stats.attempts, stats.retries);
    println!();

    if stats.skipped() > 0 {
        println!("Skips by Reason:");
        for (code, count) in &stats.skipped_by_status {
            println!("  HTTP {}: {}", code, count);
        }
        if stats.no_such_host > 0 {
            println!("  No such host: {}", stats.no_such_host);
        }
        if stats.invalid_url > 0 {
            println!("  Invalid URL: {}", stats.invalid_url);
        }
        if stats.retry_exhausted > 0 {
            println!("  Retries exhausted: {}", stats.retry_exhausted);
        }
        println!();
    }

    if !stats.missing_fields.is_empty() {
        println!("Scraped Pages Missing a Field:");
        for (field, count) in &stats.missing_fields {
            println!("  {}: {}", field, count);
        }
        println!();
    }

    println!("Timing:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
}
