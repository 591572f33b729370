//! URL handling module for Semi-Scrape
//!
//! This module provides target URL parsing, domain extraction, host glob
//! matching, and domain policy lookup.

mod domain;
mod matcher;

use crate::config::DomainPolicy;

// Re-export main functions
pub use domain::{extract_domain, parse_target};
pub use matcher::matches_glob;

/// Finds the policy that governs a host
///
/// Policies are checked in declaration order and the first matching glob
/// wins. `None` means the host falls under the default policy: unbounded
/// concurrency and no delay.
///
/// # Examples
///
/// ```
/// use semi_scrape::config::DomainPolicy;
/// use semi_scrape::url::find_policy;
///
/// let policies = vec![DomainPolicy::new("*nvidia.*", 5, 1000, 1000)];
/// assert!(find_policy("www.nvidia.com", &policies).is_some());
/// assert!(find_policy("example.org", &policies).is_none());
/// ```
pub fn find_policy<'a>(domain: &str, policies: &'a [DomainPolicy]) -> Option<&'a DomainPolicy> {
    position_of_policy(domain, policies).map(|index| &policies[index])
}

/// Index variant of [`find_policy`]
pub fn position_of_policy(domain: &str, policies: &[DomainPolicy]) -> Option<usize> {
    policies
        .iter()
        .position(|policy| matches_glob(&policy.pattern, domain))
}
