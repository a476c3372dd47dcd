use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Book-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Target site addresses
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Landing page exposing the category navigation block
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Base path that product card links are resolved against
    #[serde(rename = "catalogue-base")]
    pub catalogue_base: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: "https://books.toscrape.com/".to_string(),
            catalogue_base: "https://books.toscrape.com/catalogue/".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "BookScraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://books.toscrape.com/".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Upper bound on in-flight product page and image requests
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Whether cover images are saved next to the CSV
    #[serde(rename = "download-images")]
    pub download_images: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 4,
            request_timeout_secs: 30,
            download_images: true,
        }
    }
}

/// How exported files are arranged on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// One folder per export with an `images/` subfolder
    #[default]
    Folders,
    /// CSV files directly in the output directory
    Flat,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory every export is written under
    pub directory: PathBuf,

    /// File arrangement
    pub layout: OutputLayout,

    /// Write one CSV with every product when exporting the whole site
    #[serde(rename = "combined-site-csv")]
    pub combined_site_csv: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            layout: OutputLayout::Folders,
            combined_site_csv: true,
        }
    }
}
