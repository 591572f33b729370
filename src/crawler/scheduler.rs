//! Per-domain request scheduling
//!
//! This module handles:
//! - Policy lookup for the host of every request
//! - Concurrency limiting via one semaphore per policy
//! - The post-request pause (delay plus random jitter)
//!
//! A policy's slots are shared by every host matching its glob. The pause is
//! taken after the request while the slot is still held, so it spaces the
//! requests that go through the same slot. Hosts that match no policy are
//! never throttled.

use crate::config::DomainPolicy;
use crate::url::position_of_policy;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A granted request slot
///
/// Dropping it without calling [`ScheduledFetch::finish`] releases the slot
/// immediately, skipping the pause.
#[derive(Debug)]
pub struct ScheduledFetch {
    /// Pattern of the governing policy, `None` for the default policy
    pub pattern: Option<String>,

    /// Pause to take before the slot is released
    pub pause: Duration,

    _permit: Option<OwnedSemaphorePermit>,
}

impl ScheduledFetch {
    /// Takes the post-request pause, then releases the slot
    pub async fn finish(self) {
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
    }
}

/// Scheduler hands out request slots according to the domain policies
#[derive(Debug)]
pub struct Scheduler {
    policies: Vec<DomainPolicy>,

    /// One semaphore per policy, same order as `policies`
    slots: Vec<Arc<Semaphore>>,
}

impl Scheduler {
    /// Creates a scheduler for the given policy table
    ///
    /// Policies keep their declaration order; the first matching glob wins.
    pub fn new(policies: &[DomainPolicy]) -> Self {
        let slots = policies
            .iter()
            .map(|policy| Arc::new(Semaphore::new(policy.parallelism.max(1) as usize)))
            .collect();

        Self {
            policies: policies.to_vec(),
            slots,
        }
    }

    /// Waits for a slot for a request to `domain`
    ///
    /// Returns immediately for hosts under the default policy.
    pub async fn acquire(&self, domain: &str) -> ScheduledFetch {
        let Some(index) = position_of_policy(domain, &self.policies) else {
            tracing::trace!("{} uses the default policy", domain);
            return ScheduledFetch {
                pattern: None,
                pause: Duration::ZERO,
                _permit: None,
            };
        };

        let policy = &self.policies[index];
        tracing::trace!("{} matched policy {}", domain, policy.pattern);

        // The semaphores are never closed, so acquiring cannot fail
        let permit = Arc::clone(&self.slots[index]).acquire_owned().await.ok();

        ScheduledFetch {
            pattern: Some(policy.pattern.clone()),
            pause: pause_for(policy),
            _permit: permit,
        }
    }

    /// Returns the policy governing `domain`, if any
    pub fn policy_for(&self, domain: &str) -> Option<&DomainPolicy> {
        position_of_policy(domain, &self.policies).map(|index| &self.policies[index])
    }

    /// Number of currently free slots for the policy governing `domain`
    ///
    /// `None` for hosts under the unbounded default policy.
    pub fn available_slots(&self, domain: &str) -> Option<usize> {
        position_of_policy(domain, &self.policies)
            .map(|index| self.slots[index].available_permits())
    }
}

/// Picks the pause for one request: the fixed delay plus up to `jitter`
fn pause_for(policy: &DomainPolicy) -> Duration {
    let jitter = if policy.jitter_ms > 0 {
        rand::thread_rng().gen_range(0..=policy.jitter_ms)
    } else {
        0
    };
    policy.delay() + Duration::from_millis(jitter)
}
