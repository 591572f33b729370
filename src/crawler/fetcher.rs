//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the static browser-like header table
//! - Transport settings (timeouts, redirects, TLS, connection reuse)
//! - GET requests that reduce every response to success or `FetchFailure`

use crate::config::Config;
use crate::crawler::classifier::FetchFailure;
use crate::ScrapeError;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{redirect::Policy, Client};
use url::Url;

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchResult {
    /// The final response (after redirects) was 2xx or 3xx
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Error status or transport error
    Failure(FetchFailure),
}

/// Builds an HTTP client with proper configuration
///
/// Connection reuse is disabled: a batch touches thousands of short-lived
/// hosts and idle pooled sockets only pile up file descriptors. Cookies are
/// never stored.
///
/// # Example
///
/// ```no_run
/// use semi_scrape::config::Config;
/// use semi_scrape::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, ScrapeError> {
    let crawler = &config.crawler;

    let client = Client::builder()
        .user_agent(config.headers.user_agent.as_str())
        .default_headers(default_headers(config)?)
        .timeout(crawler.request_timeout())
        .connect_timeout(crawler.connect_timeout())
        .redirect(Policy::limited(crawler.max_redirects))
        .pool_max_idle_per_host(0)
        .danger_accept_invalid_certs(crawler.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Builds the static header table sent with every request
fn default_headers(config: &Config) -> Result<HeaderMap, ScrapeError> {
    let headers = &config.headers;
    let mut map = HeaderMap::new();

    for (name, value) in [
        (ACCEPT, &headers.accept),
        (ACCEPT_LANGUAGE, &headers.accept_language),
        (CACHE_CONTROL, &headers.cache_control),
        (UPGRADE_INSECURE_REQUESTS, &headers.upgrade_insecure_requests),
    ] {
        if value.is_empty() {
            continue;
        }
        let value = header_value(&name, value)?;
        map.insert(name, value);
    }

    Ok(map)
}

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, ScrapeError> {
    HeaderValue::from_str(value).map_err(|e| ScrapeError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Fetches a URL once
///
/// # Response Handling
///
/// | Condition | Result |
/// |-----------|--------|
/// | Final status 2xx/3xx, body read | `Success` |
/// | Final status 2xx/3xx, body read fails | `Failure` with that status |
/// | Any other status | `Failure` with the status |
/// | Timeout, connect error, redirect limit, DNS | `Failure` without status |
///
/// Classification of the failure is left to the caller.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return FetchResult::Failure(FetchFailure::transport(error_chain(&e))),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !(status.is_success() || status.is_redirection()) {
        return FetchResult::Failure(FetchFailure::status(status.as_u16()));
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::Failure(FetchFailure {
            status: Some(status.as_u16()),
            error: error_chain(&e),
        }),
    }
}

/// Renders an error together with every error in its source chain
///
/// reqwest hides the resolver message ("dns error: ...") in the source
/// chain, and the classifier needs to see it.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}
