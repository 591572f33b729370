use crate::config::types::{Config, CrawlerConfig, DomainPolicy, HeaderConfig, PathConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_headers(&config.headers)?;
    validate_paths(&config.paths)?;
    validate_domain_policies(&config.domains)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 || config.request_timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 600, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.request_timeout_secs
    {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and request_timeout_secs ({}), got {}",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    // An unbounded retry loop can hang the batch forever on one bad host
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(
            "max_attempts must be >= 1".to_string(),
        ));
    }

    if config.max_backoff_ms < config.retry_backoff_ms {
        return Err(ConfigError::Validation(format!(
            "max_backoff_ms ({}) must be >= retry_backoff_ms ({})",
            config.max_backoff_ms, config.retry_backoff_ms
        )));
    }

    Ok(())
}

/// Validates that every configured header is a legal header value
fn validate_headers(config: &HeaderConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("user_agent", &config.user_agent),
        ("accept", &config.accept),
        ("accept_language", &config.accept_language),
        ("cache_control", &config.cache_control),
        ("upgrade_insecure_requests", &config.upgrade_insecure_requests),
    ] {
        if HeaderValue::from_str(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} is not a valid header value: '{}'",
                name, value
            )));
        }
    }

    Ok(())
}

fn validate_paths(config: &PathConfig) -> Result<(), ConfigError> {
    if config.url_list.is_empty() {
        return Err(ConfigError::Validation(
            "url_list cannot be empty".to_string(),
        ));
    }

    if config.output_csv.is_empty() {
        return Err(ConfigError::Validation(
            "output_csv cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates domain policy entries
fn validate_domain_policies(policies: &[DomainPolicy]) -> Result<(), ConfigError> {
    for policy in policies {
        validate_glob(&policy.pattern)?;

        if policy.parallelism < 1 {
            return Err(ConfigError::Validation(format!(
                "Domain policy '{}' must have parallelism >= 1",
                policy.pattern
            )));
        }
    }

    Ok(())
}

/// Validates a host glob (letters, digits, '.', '-', '*' and '?')
fn validate_glob(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    if !pattern
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '*' | '?'))
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain pattern '{}' contains invalid characters",
            pattern
        )));
    }

    if pattern.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain pattern '{}' must be lowercase",
            pattern
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_glob() {
        assert!(validate_glob("*nvidia.*").is_ok());
        assert!(validate_glob("*cadence*").is_ok());
        assert!(validate_glob("www.example.com").is_ok());
        assert!(validate_glob("host-??.example.com").is_ok());

        assert!(validate_glob("").is_err());
        assert!(validate_glob("*nvidia.com/path").is_err());
        assert!(validate_glob("[ab].com").is_err());
        assert!(validate_glob("*NVIDIA.*").is_err());
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let policies = vec![DomainPolicy::new("*.example.com", 0, 0, 0)];
        assert!(matches!(
            validate_domain_policies(&policies),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = CrawlerConfig {
            max_attempts: 0,
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        let too_long = CrawlerConfig {
            request_timeout_secs: 601,
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&too_long).is_err());

        let connect_exceeds = CrawlerConfig {
            request_timeout_secs: 5,
            connect_timeout_secs: 10,
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&connect_exceeds).is_err());
    }

    #[test]
    fn test_backoff_ceiling_below_base_rejected() {
        let config = CrawlerConfig {
            retry_backoff_ms: 5_000,
            max_backoff_ms: 1_000,
            ..CrawlerConfig::default()
        };
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_header_with_newline_rejected() {
        let headers = HeaderConfig {
            accept_language: "en\nX-Injected: 1".to_string(),
            ..HeaderConfig::default()
        };
        assert!(validate_headers(&headers).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let headers = HeaderConfig {
            user_agent: "  ".to_string(),
            ..HeaderConfig::default()
        };
        assert!(validate_headers(&headers).is_err());
    }
}
