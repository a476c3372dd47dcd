//! Book-Scraper: a catalogue exporter for the books.toscrape.com demo store
//!
//! This crate walks category listings, follows pagination, extracts one
//! normalized record per product page, and writes the records to CSV files
//! alongside the downloaded cover images.

pub mod config;
pub mod crawler;
pub mod output;
pub mod product;

use thiserror::Error;

pub use output::ExportError;

/// Main error type for Book-Scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Unexpected page structure at {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Product extraction failed for {url}: {message}")]
    Extract { url: String, message: String },

    #[error("Image download failed for {url}: {message}")]
    Download { url: String, message: String },

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Short label naming the failure kind, used in per-item diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Parse { .. } => "parse",
            Self::Extract { .. } => "extract",
            Self::Download { .. } => "download",
            Self::Export(_) => "export",
            Self::Config(_) => "config",
            Self::UrlParse(_) => "url",
            Self::HttpClient(_) => "http-client",
            Self::Io(_) => "io",
        }
    }

    pub(crate) fn parse(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.into(),
        }
    }

    pub(crate) fn extract(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extract {
            url: url.into(),
            message: message.into(),
        }
    }
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

/// Result type alias for Book-Scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Fetcher};
pub use output::{ExportScope, RunSummary};
pub use product::{ProductRecord, NOT_AVAILABLE};
