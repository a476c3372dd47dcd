//! Run statistics for an export operation
//!
//! Per-item failures are logged as they happen; this module keeps the counts
//! and offending URLs so a summary can be shown when the run completes.

use crate::ScrapeError;
use std::path::PathBuf;

/// A product or image that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub url: String,
    /// Failure kind label, see [`ScrapeError::kind`]
    pub kind: &'static str,
    pub message: String,
}

impl ItemFailure {
    pub fn from_error(url: &str, error: &ScrapeError) -> Self {
        Self {
            url: url.to_string(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Outcome counts of an export run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of catalogues fully exported
    pub catalogues_exported: u64,

    /// Number of product rows written
    pub products_exported: u64,

    /// Number of images saved to disk
    pub images_saved: u64,

    /// CSV files written by this run
    pub csv_files: Vec<PathBuf>,

    /// Product pages that could not be extracted
    pub product_failures: Vec<ItemFailure>,

    /// Images that could not be downloaded
    pub image_failures: Vec<ItemFailure>,

    /// Catalogues skipped during a site export
    pub catalogue_failures: Vec<ItemFailure>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds another summary into this one
    pub fn merge(&mut self, other: RunSummary) {
        self.catalogues_exported += other.catalogues_exported;
        self.products_exported += other.products_exported;
        self.images_saved += other.images_saved;
        self.csv_files.extend(other.csv_files);
        self.product_failures.extend(other.product_failures);
        self.image_failures.extend(other.image_failures);
        self.catalogue_failures.extend(other.catalogue_failures);
    }

    /// Total number of skipped items of any kind
    pub fn failure_count(&self) -> usize {
        self.product_failures.len() + self.image_failures.len() + self.catalogue_failures.len()
    }

    /// True when the run produced no product rows
    pub fn is_empty(&self) -> bool {
        self.products_exported == 0
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Export Summary ===\n");

    println!("  Catalogues exported: {}", summary.catalogues_exported);
    println!("  Products exported: {}", summary.products_exported);
    println!("  Images saved: {}", summary.images_saved);
    println!("  Skipped items: {}", summary.failure_count());
    println!();

    if !summary.csv_files.is_empty() {
        println!("CSV files ({}):", summary.csv_files.len());
        for path in &summary.csv_files {
            println!("  - {}", path.display());
        }
        println!();
    }

    for (label, failures) in [
        ("Failed products", &summary.product_failures),
        ("Failed images", &summary.image_failures),
        ("Failed catalogues", &summary.catalogue_failures),
    ] {
        if failures.is_empty() {
            continue;
        }
        println!("{} ({}):", label, failures.len());
        for failure in failures {
            println!("  - [{}] {}", failure.kind, failure.url);
        }
        println!();
    }
}
