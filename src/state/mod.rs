//! State module for tracking crawl results
//!
//! # Components
//!
//! - `Record`: the accumulating per-URL result and its skip reason
//! - `Aggregator`: the concurrent URL → record store with first-writer-wins merging
//! - `CompletionTracker`: the outstanding-request counter that gates the report

mod aggregator;
mod record;
mod tracker;

// Re-export main types
pub use aggregator::Aggregator;
pub use record::{
    Field, Record, ResolvedRecord, SkipReason, NO_H1, NO_META_DESCRIPTION, NO_TITLE,
};
pub use tracker::CompletionTracker;
