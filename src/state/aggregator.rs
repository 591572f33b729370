//! Concurrent per-URL record store
//!
//! All mutation goes through DashMap's entry API, which holds the shard lock
//! for the whole read-modify-write of a record. Two events racing on the same
//! URL are serialized and neither update is lost.

use crate::state::record::{Field, Record, ResolvedRecord, SkipReason};
use dashmap::DashMap;

/// Merges field events and skip outcomes into one record per URL
#[derive(Debug, Default)]
pub struct Aggregator {
    records: DashMap<String, Record>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one extracted value to a URL's record
    ///
    /// Creates the record if needed. The call is a no-op when the field
    /// already holds a non-empty value, when `value` is blank, or when the
    /// record was skipped.
    ///
    /// # Returns
    ///
    /// `true` if the stored record changed
    pub fn apply_field(&self, url: &str, field: Field, value: &str) -> bool {
        let mut record = self
            .records
            .entry(url.to_string())
            .or_insert_with(|| Record::new(url));

        let changed = record.set_if_empty(field, value);
        if !changed {
            tracing::trace!("Ignored {} for {}: already set or empty", field, url);
        }
        changed
    }

    /// Terminates a URL's record with a skip placeholder
    ///
    /// A skip overwrites whatever partial data the record held.
    pub fn apply_skip(&self, url: &str, reason: SkipReason) {
        self.records
            .insert(url.to_string(), Record::skipped(url, reason));
    }

    /// Marks a URL as successfully scraped
    ///
    /// Creates an empty record for pages that yielded no fields at all so
    /// they still show up in the report.
    pub fn mark_scraped(&self, url: &str) {
        let mut record = self
            .records
            .entry(url.to_string())
            .or_insert_with(|| Record::new(url));
        record.terminal = true;
    }

    /// Returns a copy of the record for `url`
    pub fn get(&self, url: &str) -> Option<Record> {
        self.records.get(url).map(|entry| entry.value().clone())
    }

    /// Point-in-time copy of every record
    pub fn records(&self) -> Vec<Record> {
        self.records
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Point-in-time copy of every record, sentinels substituted
    pub fn snapshot(&self) -> Vec<ResolvedRecord> {
        self.records
            .iter()
            .map(|entry| entry.value().resolve())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records that will receive no further updates
    pub fn terminal_count(&self) -> usize {
        self.records
            .iter()
            .filter(|entry| entry.value().terminal)
            .count()
    }
}
