//! Contact-Trawl: a contact email finder for business websites
//!
//! Given a sheet of business records, this crate visits each record's website
//! and tries to locate a public contact email through a layered fallback:
//! homepage, then contact/about pages, then linked social profiles.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Contact-Trawl operations
///
/// Only batch-fatal conditions end up here. Failures inside a single record's
/// discovery pipeline degrade to empty output instead of propagating.
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL normalization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Empty URL")]
    Empty,

    #[error("Malformed URL: {0}")]
    Malformed(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

impl UrlError {
    /// Returns true for the "nothing to crawl" case as opposed to a bad value
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Result type alias for Contact-Trawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Discovery, InputRecord, OutputRecord, Tier};
pub use url::{normalize_website, NormalizedUrl};
