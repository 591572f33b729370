use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lowercase host without port, or `None` when the URL has no
/// host or an empty one.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use semi_scrape::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Parses one line of the URL list into a fetchable target
///
/// Only absolute `http`/`https` URLs with a non-empty host are accepted.
pub fn parse_target(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if extract_domain(&url).is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
