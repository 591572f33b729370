//! Crawler module for page fetching and field extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching under a static header table
//! - Failure classification into skip or retry
//! - Per-domain request scheduling and rate limiting
//! - Field extraction from fetched HTML
//! - Overall batch coordination and completion tracking

mod classifier;
mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;

pub use classifier::{classify_failure, is_permanent_status, FetchFailure, Verdict};
pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use extractor::{extract_fields, FieldEvent};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use scheduler::{ScheduledFetch, Scheduler};
