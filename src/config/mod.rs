//! Configuration module for Book-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file targets the public demo store.
//!
//! # Example
//!
//! ```no_run
//! use book_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Catalogue base: {}", config.site.catalogue_base);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, OutputLayout, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
