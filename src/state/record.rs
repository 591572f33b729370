//! Per-URL record definitions
//!
//! A `Record` accumulates field values for one URL until it reaches a
//! terminal state. Skipped records carry a `SkipReason` whose placeholder
//! replaces all three fields in the report.
use std::fmt;

/// Report sentinel for a page without a usable `<h1>`
pub const NO_H1: &str = "{no_h1}";

/// Report sentinel for a page without a usable meta description
pub const NO_META_DESCRIPTION: &str = "{no_meta_des}";

/// Report sentinel for a page without a usable `<title>`
pub const NO_TITLE: &str = "{no_title}";

/// The three fields extracted from every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    H1,
    MetaDescription,
    Title,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::H1, Field::MetaDescription, Field::Title];

    /// Sentinel rendered when the field never received a value
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::H1 => NO_H1,
            Self::MetaDescription => NO_META_DESCRIPTION,
            Self::Title => NO_TITLE,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::H1 => "h1",
            Self::MetaDescription => "meta_des",
            Self::Title => "title",
        };
        write!(f, "{}", s)
    }
}

/// Why a URL was given up on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The server answered with a non-retryable status
    Status(u16),

    /// The host name does not resolve
    NoSuchHost,

    /// The input line is not an absolute http(s) URL with a host
    InvalidUrl,

    /// Every allowed attempt failed with a retryable error
    RetryExhausted,
}

impl SkipReason {
    /// Text written into all three fields of a skipped record
    pub fn placeholder(&self) -> String {
        match self {
            Self::Status(code) => format!("{{skip_{}}}", code),
            Self::NoSuchHost => "skip_no_such_host".to_string(),
            Self::InvalidUrl => "{skip_invalid_url}".to_string(),
            Self::RetryExhausted => "{skip_retry_exhausted}".to_string(),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::NoSuchHost => write!(f, "no such host"),
            Self::InvalidUrl => write!(f, "invalid URL"),
            Self::RetryExhausted => write!(f, "retries exhausted"),
        }
    }
}

/// Accumulated extraction result for one URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub url: String,
    pub h1: Option<String>,
    pub meta_description: Option<String>,
    pub title: Option<String>,

    /// No further updates are expected
    pub terminal: bool,

    /// Set when the record was terminated by a skip
    pub skip: Option<SkipReason>,
}

impl Record {
    /// Creates an empty, non-terminal record
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// Creates a terminal record with every field set to the skip placeholder
    pub fn skipped(url: &str, reason: SkipReason) -> Self {
        let placeholder = reason.placeholder();
        Self {
            url: url.to_string(),
            h1: Some(placeholder.clone()),
            meta_description: Some(placeholder.clone()),
            title: Some(placeholder),
            terminal: true,
            skip: Some(reason),
        }
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::H1 => self.h1.as_deref(),
            Field::MetaDescription => self.meta_description.as_deref(),
            Field::Title => self.title.as_deref(),
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::H1 => &mut self.h1,
            Field::MetaDescription => &mut self.meta_description,
            Field::Title => &mut self.title,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skip.is_some()
    }

    /// Sets `field` unless it already holds a non-empty value
    ///
    /// Returns true if the record changed. Empty values are treated as
    /// absent: they are never stored and never block a later write.
    pub fn set_if_empty(&mut self, field: Field, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.is_skipped() {
            return false;
        }

        let slot = self.field_mut(field);
        if slot.as_deref().is_some_and(|existing| !existing.is_empty()) {
            return false;
        }

        *slot = Some(value.to_string());
        true
    }

    /// Returns the record with sentinels substituted for missing fields
    pub fn resolve(&self) -> ResolvedRecord {
        let pick = |field: Field| -> String {
            match self.field(field) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => field.sentinel().to_string(),
            }
        };

        ResolvedRecord {
            h1: pick(Field::H1),
            meta_description: pick(Field::MetaDescription),
            title: pick(Field::Title),
            url: self.url.clone(),
        }
    }
}

/// A record ready for the report: every field holds text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub h1: String,
    pub meta_description: String,
    pub title: String,
    pub url: String,
}
