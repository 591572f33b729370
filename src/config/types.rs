use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Semi-Scrape
///
/// Every section is optional in the TOML file. A missing section takes the
/// built-in defaults, which reproduce the stock vendor crawl.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub headers: HeaderConfig,
    pub paths: PathConfig,
    #[serde(rename = "domain")]
    pub domains: Vec<DomainPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            headers: HeaderConfig::default(),
            paths: PathConfig::default(),
            domains: default_vendor_policies(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Total time allowed for one request, in seconds
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection, in seconds
    pub connect_timeout_secs: u64,

    /// Maximum number of fetch attempts per URL before giving up
    pub max_attempts: u32,

    /// Back-off before the first retry (milliseconds); doubles on each retry
    pub retry_backoff_ms: u64,

    /// Upper bound for the retry back-off (milliseconds)
    pub max_backoff_ms: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,

    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 25,
            connect_timeout_secs: 10,
            max_attempts: 8,
            retry_backoff_ms: 3_000,
            max_backoff_ms: 30_000,
            max_redirects: 10,
            accept_invalid_certs: true,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Back-off to sleep before attempt number `attempt + 1`
    ///
    /// `attempt` is the 1-based number of the attempt that just failed.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let millis = self
            .retry_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }
}

/// Static request headers sent with every fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HeaderConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub cache_control: String,
    pub upgrade_insecure_requests: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            user_agent:
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0"
                    .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "zh-TW,zh;q=0.8,en-US;q=0.5,en;q=0.3".to_string(),
            cache_control: "max-age=0".to_string(),
            upgrade_insecure_requests: "1".to_string(),
        }
    }
}

/// Input and output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PathConfig {
    /// Newline-delimited list of URLs to fetch
    pub url_list: String,

    /// CSV report destination
    pub output_csv: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            url_list: "./semi_url_list.txt".to_string(),
            output_csv: "./output.csv".to_string(),
        }
    }
}

/// Rate limit policy for hosts matching a glob pattern
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DomainPolicy {
    /// Host glob (e.g. "*nvidia.*"); `*` matches any run, `?` one character
    pub pattern: String,

    /// Maximum concurrent requests shared by all hosts matching the pattern
    pub parallelism: u32,

    /// Fixed pause after each request (milliseconds)
    #[serde(default)]
    pub delay_ms: u64,

    /// Upper bound of the random pause added on top of `delay_ms`
    #[serde(default)]
    pub jitter_ms: u64,
}

impl DomainPolicy {
    pub fn new(pattern: &str, parallelism: u32, delay_ms: u64, jitter_ms: u64) -> Self {
        Self {
            pattern: pattern.to_string(),
            parallelism,
            delay_ms,
            jitter_ms,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }
}

const VENDOR_PATTERNS: &[&str] = &[
    "*altair.*",
    "*ansys.*",
    "*broadcom.*",
    "*cadence*",
    "*dialog-semiconductor.*",
    "*siemens.*",
    "*globalfoundries.*",
    "*marvell.*",
    "*mediatek.*",
    "*novatek.*",
    "*nvidia.*",
    "*qualcomm.*",
    "*realtek.*",
    "*silvaco.*",
    "*synopsys.*",
    "*tsmc.*",
    "*umc.*",
    "*xilinx.*",
];

/// The stock policy table: every known vendor gets 5 slots, 1s delay, 1s jitter
pub fn default_vendor_policies() -> Vec<DomainPolicy> {
    VENDOR_PATTERNS
        .iter()
        .map(|pattern| DomainPolicy::new(pattern, 5, 1_000, 1_000))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_vendors() {
        let policies = default_vendor_policies();
        assert_eq!(policies.len(), 18);
        assert!(policies.iter().all(|p| p.parallelism == 5));
        assert!(policies.iter().any(|p| p.pattern == "*cadence*"));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = CrawlerConfig {
            retry_backoff_ms: 1_000,
            max_backoff_ms: 5_000,
            ..CrawlerConfig::default()
        };

        assert_eq!(config.backoff_for(1), Duration::from_millis(1_000));
        assert_eq!(config.backoff_for(2), Duration::from_millis(2_000));
        assert_eq!(config.backoff_for(3), Duration::from_millis(4_000));
        assert_eq!(config.backoff_for(4), Duration::from_millis(5_000));
        assert_eq!(config.backoff_for(40), Duration::from_millis(5_000));
    }

    #[test]
    fn test_zero_backoff() {
        let config = CrawlerConfig {
            retry_backoff_ms: 0,
            ..CrawlerConfig::default()
        };
        assert_eq!(config.backoff_for(3), Duration::ZERO);
    }
}
