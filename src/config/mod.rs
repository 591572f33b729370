//! Configuration module for Semi-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key is optional; `Config::default()` carries the stock vendor
//! rate-limit table and the default input/output paths.
//!
//! # Example
//!
//! ```no_run
//! use semi_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Rate-limited patterns: {}", config.domains.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_vendor_policies, Config, CrawlerConfig, DomainPolicy, HeaderConfig, PathConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
