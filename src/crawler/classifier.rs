//! Fetch failure classification
//!
//! Decides whether a failed fetch is worth retrying within the lifetime of the
//! batch.
//!
//! | Condition | Verdict |
//! |-----------|---------|
//! | Empty host | Skip → `InvalidUrl` |
//! | HTTP 400–407 | Skip → `Status` |
//! | HTTP 408 | Retry |
//! | HTTP 409–599 | Skip → `Status` |
//! | DNS resolution failure | Skip → `NoSuchHost` |
//! | Anything else (resets, timeouts, redirect errors) | Retry |

use crate::state::SkipReason;

/// Error texts that mean the host name does not resolve
const DNS_FAILURE_MARKERS: &[&str] = &[
    "no such host",
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname provided",
];

/// A failed fetch as seen by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Final HTTP status, if a response arrived at all
    pub status: Option<u16>,

    /// Transport error text, including the error's source chain
    pub error: String,
}

impl FetchFailure {
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            error: format!("HTTP {}", status),
        }
    }

    pub fn transport(error: impl Into<String>) -> Self {
        Self {
            status: None,
            error: error.into(),
        }
    }
}

/// Outcome of classifying a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Give up on the URL and record the reason
    Skip(SkipReason),

    /// Try the URL again
    Retry,
}

/// Classifies a failed fetch
///
/// # Arguments
///
/// * `host` - Host of the requested URL (empty when it had none)
/// * `failure` - The status and error text of the failed attempt
///
/// # Example
///
/// ```
/// use semi_scrape::crawler::{classify_failure, FetchFailure, Verdict};
/// use semi_scrape::state::SkipReason;
///
/// let verdict = classify_failure("bad.example", &FetchFailure::status(500));
/// assert_eq!(verdict, Verdict::Skip(SkipReason::Status(500)));
///
/// let verdict = classify_failure("slow.example", &FetchFailure::status(408));
/// assert_eq!(verdict, Verdict::Retry);
/// ```
pub fn classify_failure(host: &str, failure: &FetchFailure) -> Verdict {
    if host.is_empty() {
        return Verdict::Skip(SkipReason::InvalidUrl);
    }

    if let Some(status) = failure.status {
        if is_permanent_status(status) {
            return Verdict::Skip(SkipReason::Status(status));
        }
    }

    if is_dns_failure(&failure.error) {
        return Verdict::Skip(SkipReason::NoSuchHost);
    }

    Verdict::Retry
}

/// Client and server errors are permanent, except 408 Request Timeout
pub fn is_permanent_status(status: u16) -> bool {
    (400..600).contains(&status) && status != 408
}

fn is_dns_failure(error: &str) -> bool {
    let error = error.to_ascii_lowercase();
    DNS_FAILURE_MARKERS
        .iter()
        .any(|marker| error.contains(marker))
}
