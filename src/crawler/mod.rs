//! Crawler module for page fetching and product extraction
//!
//! This module contains the core scraping pipeline, including:
//! - HTTP fetching and image streaming
//! - Category discovery from the landing page
//! - Catalogue pagination
//! - Product detail extraction
//! - Scope-driven export coordination

mod categories;
mod coordinator;
mod extractor;
mod fetcher;
mod paginator;
mod parser;

pub use categories::{list_categories, parse_category_links};
pub use coordinator::{run_export, Coordinator, ExportRequest};
pub use extractor::{extract_product, parse_product_page};
pub use fetcher::{build_http_client, Fetcher};
pub use paginator::{collect_catalogue, parse_catalogue_page, CatalogueLinks, CataloguePage};
pub use parser::{element_text, resolve_link, resolve_product_link};
