//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Streaming image downloads to disk
//! - Error classification
//!
//! There is no retry policy: a failed request fails the enclosing operation.

use crate::config::{Config, UserAgentConfig};
use crate::{Result, ScrapeError};
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use book_scraper::config::UserAgentConfig;
/// use book_scraper::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher and image downloader sharing one connection pool
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher from the scraper configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        Ok(Self { client })
    }

    /// Fetches a page and returns its body as text
    ///
    /// # Errors
    ///
    /// `ScrapeError::Fetch` when the URL is empty, the transport fails, or the
    /// server answers with a non-success status.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.get(url).await.map_err(|message| ScrapeError::Fetch {
            url: url.to_string(),
            message,
        })?;

        response.text().await.map_err(|e| ScrapeError::Fetch {
            url: url.to_string(),
            message: format!("Failed to read body: {}", e),
        })
    }

    /// Streams an image to `dest` chunk by chunk
    ///
    /// Parent folders are created as needed. A partially written file is
    /// removed if the stream breaks.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of bytes written
    /// * `Err(ScrapeError::Download)` - Request, status, or write failure
    pub async fn download_image(&self, url: &str, dest: &Path) -> Result<u64> {
        let download_error = |message: String| ScrapeError::Download {
            url: url.to_string(),
            message,
        };

        let mut response = self.get(url).await.map_err(download_error)?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;

        let mut written = 0u64;
        let streamed: std::result::Result<(), String> = async {
            while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
                file.write_all(&chunk).await.map_err(|e| e.to_string())?;
                written += chunk.len() as u64;
            }
            file.flush().await.map_err(|e| e.to_string())
        }
        .await;

        if let Err(message) = streamed {
            drop(file);
            let _ = tokio::fs::remove_file(dest).await;
            return Err(download_error(message));
        }

        tracing::debug!("Saved {} bytes from {} to {}", written, url, dest.display());
        Ok(written)
    }

    /// Sends a GET and classifies failures into a message
    async fn get(&self, url: &str) -> std::result::Result<Response, String> {
        if url.trim().is_empty() {
            return Err("Empty URL".to_string());
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        Ok(response)
    }
}
