//! Export coordinator - scope-driven pipeline orchestration
//!
//! This module runs the crawl-and-extract pipeline for one export request:
//! - Discovering categories and walking catalogue pagination
//! - Extracting product pages through a bounded worker pool
//! - Downloading cover images on a best-effort basis
//! - Writing the CSV for the requested scope
//!
//! Discovery failures abort the request. Product and image failures are
//! logged with their URL, recorded in the [`RunSummary`], and skipped.

use crate::config::Config;
use crate::crawler::categories::list_categories;
use crate::crawler::extractor::extract_product;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::paginator::collect_catalogue;
use crate::output::{time_stamp, write_csv, ExportScope, ImageNamer, ItemFailure, RunSummary};
use crate::product::{slugify, ProductRecord};
use crate::Result;
use chrono::{Local, NaiveDateTime};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// What a run should export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRequest {
    /// A single product detail page
    Product(String),
    /// A catalogue, given its first listing page
    Catalogue(String),
    /// Every catalogue linked from the site root
    Site,
}

/// Main export coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Fetcher,
    root_url: Url,
    catalogue_base: Url,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScrapeError)` - Invalid site URLs or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Result<Self> {
        let root_url = Url::parse(&config.site.root_url)?;
        let catalogue_base = Url::parse(&config.site.catalogue_base)?;

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            root_url,
            catalogue_base,
        })
    }

    /// Runs one export request
    pub async fn run(&self, request: &ExportRequest) -> Result<RunSummary> {
        match request {
            ExportRequest::Product(url) => self.export_product(url).await,
            ExportRequest::Catalogue(url) => self.export_catalogue(url).await,
            ExportRequest::Site => self.export_site().await,
        }
    }

    /// Exports one product page to its own CSV and image folder
    ///
    /// With a single product there is no batch to protect, so an extraction
    /// failure is returned to the caller.
    pub async fn export_product(&self, url: &str) -> Result<RunSummary> {
        let url = Url::parse(url)?;
        let record = extract_product(&self.fetcher, &url).await?;

        let scope = ExportScope::Product {
            title: record.title.clone(),
        };
        let mut summary = RunSummary::new();
        self.finish_export(&scope, &self.config.output.directory, vec![record], &mut summary)
            .await?;

        Ok(summary)
    }

    /// Exports every product of one catalogue
    pub async fn export_catalogue(&self, url: &str) -> Result<RunSummary> {
        let url = Url::parse(url)?;
        let (summary, _) = self.export_catalogue_records(&url).await?;
        Ok(summary)
    }

    /// Exports every catalogue reachable from the site root
    ///
    /// The first category link (the all-books listing) is skipped. A catalogue
    /// that fails is logged and counted while the rest continue.
    pub async fn export_site(&self) -> Result<RunSummary> {
        let categories = list_categories(&self.fetcher, &self.root_url).await?;
        let mut summary = RunSummary::new();

        if categories.len() <= 1 {
            tracing::warn!("No categories to export from {}", self.root_url);
            return Ok(summary);
        }

        let total = categories.len() - 1;
        let mut all_records = Vec::new();

        for (idx, category) in categories.iter().skip(1).enumerate() {
            tracing::info!("Category {}/{}: {}", idx + 1, total, category);

            match self.export_catalogue_records(category).await {
                Ok((part, records)) => {
                    summary.merge(part);
                    all_records.extend(records);
                }
                Err(e) => {
                    tracing::warn!("Skipping catalogue {} ({}): {}", category, e.kind(), e);
                    summary
                        .catalogue_failures
                        .push(ItemFailure::from_error(category.as_str(), &e));
                }
            }
        }

        if self.config.output.combined_site_csv && !all_records.is_empty() {
            let scope = ExportScope::Site {
                name: self.site_name(),
            };
            let paths = scope.paths(
                &self.config.output.directory,
                self.config.output.layout,
                Local::now().naive_local(),
            );
            write_csv(&paths.csv_path, &all_records)?;
            summary.csv_files.push(paths.csv_path);
        }

        Ok(summary)
    }

    /// Walks, extracts and writes one catalogue, returning its records too
    async fn export_catalogue_records(
        &self,
        first_page: &Url,
    ) -> Result<(RunSummary, Vec<ProductRecord>)> {
        let catalogue = collect_catalogue(&self.fetcher, first_page, &self.catalogue_base).await?;
        let mut summary = RunSummary::new();

        if catalogue.product_links.is_empty() {
            tracing::warn!("Catalogue '{}' lists no products", catalogue.name);
            return Ok((summary, Vec::new()));
        }

        let records = self
            .extract_all(catalogue.product_links, &mut summary)
            .await;

        if records.is_empty() {
            tracing::warn!(
                "No product of catalogue '{}' could be extracted",
                catalogue.name
            );
            return Ok((summary, records));
        }

        let scope = ExportScope::Catalogue {
            name: catalogue.name,
        };
        let records = self
            .finish_export(&scope, &self.config.output.directory, records, &mut summary)
            .await?;
        summary.catalogues_exported += 1;

        Ok((summary, records))
    }

    /// Extracts every product link, skipping and recording failures
    ///
    /// Records come back in link order regardless of completion order.
    async fn extract_all(&self, links: Vec<Url>, summary: &mut RunSummary) -> Vec<ProductRecord> {
        let total = links.len();
        let outcomes = self
            .run_bounded(links, |fetcher, link| async move {
                let result = extract_product(&fetcher, &link).await;
                (link, result)
            })
            .await;

        let mut records = Vec::with_capacity(total);
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                (_, Ok(record)) => records.push(record),
                (link, Err(e)) => {
                    tracing::warn!("Skipping product {} ({}): {}", link, e.kind(), e);
                    summary
                        .product_failures
                        .push(ItemFailure::from_error(link.as_str(), &e));
                }
            }
        }

        tracing::info!("Extracted {}/{} products", records.len(), total);
        records
    }

    /// Downloads images, writes the CSV, and updates the summary
    async fn finish_export(
        &self,
        scope: &ExportScope,
        root: &Path,
        records: Vec<ProductRecord>,
        summary: &mut RunSummary,
    ) -> Result<Vec<ProductRecord>> {
        let now = Local::now().naive_local();
        let paths = scope.paths(root, self.config.output.layout, now);

        if self.config.crawler.download_images {
            self.download_images(&records, &paths.image_dir, now, summary)
                .await;
        }

        let written = write_csv(&paths.csv_path, &records)?;
        summary.products_exported += written as u64;
        summary.csv_files.push(paths.csv_path);

        Ok(records)
    }

    /// Saves cover images; failures are logged and counted, never returned
    async fn download_images(
        &self,
        records: &[ProductRecord],
        image_dir: &Path,
        now: NaiveDateTime,
        summary: &mut RunSummary,
    ) {
        let stamp = time_stamp(now);
        let mut namer = ImageNamer::new();

        let jobs: Vec<(String, PathBuf)> = records
            .iter()
            .filter_map(|record| {
                let url = record.image_url.clone()?;
                let dest = namer.allocate(image_dir, &slugify(&record.title), &stamp);
                Some((url, dest))
            })
            .collect();

        let outcomes = self
            .run_bounded(jobs, |fetcher, (url, dest)| async move {
                let result = fetcher.download_image(&url, &dest).await;
                (url, result)
            })
            .await;

        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                (_, Ok(_)) => summary.images_saved += 1,
                (url, Err(e)) => {
                    tracing::warn!("Image not saved {} ({}): {}", url, e.kind(), e);
                    summary
                        .image_failures
                        .push(ItemFailure::from_error(&url, &e));
                }
            }
        }
    }

    /// Runs one task per item with at most `max-concurrent-requests` in flight
    ///
    /// Each task writes only its own slot; a slot stays `None` if its task
    /// panicked.
    async fn run_bounded<T, O, F, Fut>(&self, items: Vec<T>, task: F) -> Vec<Option<O>>
    where
        T: Send + 'static,
        O: Send + 'static,
        F: Fn(Fetcher, T) -> Fut,
        Fut: Future<Output = O> + Send + 'static,
    {
        let limit = self.config.crawler.max_concurrent_requests.max(1) as usize;
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut slots: Vec<Option<O>> = Vec::with_capacity(items.len());
        slots.resize_with(items.len(), || None);

        let mut workers = JoinSet::new();
        for (idx, item) in items.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let work = task(self.fetcher.clone(), item);
            workers.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (idx, work.await)
            });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((idx, output)) => slots[idx] = Some(output),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        slots
    }

    /// Name used for the combined site CSV
    fn site_name(&self) -> String {
        self.root_url
            .host_str()
            .map(String::from)
            .unwrap_or_else(|| "site".to_string())
    }
}

/// Runs a complete export operation
///
/// This is the main entry point for an export. It will:
/// 1. Build the HTTP client
/// 2. Discover the pages the request covers
/// 3. Extract product records and images
/// 4. Write the CSV files
pub async fn run_export(config: Config, request: &ExportRequest) -> Result<RunSummary> {
    let coordinator = Coordinator::new(config)?;
    let summary = coordinator.run(request).await?;

    tracing::info!(
        "Export finished: {} products, {} images, {} skipped",
        summary.products_exported,
        summary.images_saved,
        summary.failure_count()
    );

    Ok(summary)
}
