//! Output module for the crawl report
//!
//! This module handles:
//! - Ordering aggregated records by their position in the URL list
//! - Writing the CSV report
//! - Summarizing the batch in crawl statistics

mod csv_report;
pub mod stats;

pub use csv_report::{write_rows, CsvReport, REPORT_HEADER};
pub use stats::{print_statistics, CrawlStatistics};

use crate::state::ResolvedRecord;
use std::collections::HashMap;

/// Sorts report rows by the first position of their URL in the input
///
/// Rows whose URL is not in `urls` go last, in URL order.
pub fn order_by_input(mut rows: Vec<ResolvedRecord>, urls: &[String]) -> Vec<ResolvedRecord> {
    let mut first_index: HashMap<&str, usize> = HashMap::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
        first_index.entry(url.trim()).or_insert(index);
    }

    rows.sort_by(|a, b| {
        let ia = first_index.get(a.url.as_str()).copied().unwrap_or(usize::MAX);
        let ib = first_index.get(b.url.as_str()).copied().unwrap_or(usize::MAX);
        ia.cmp(&ib).then_with(|| a.url.cmp(&b.url))
    });

    rows
}
