//! HTML helpers shared by the page-specific extractors
//!
//! This module holds:
//! - The CSS selectors describing the store's page structure
//! - Text extraction from elements
//! - Link resolution against a page or catalogue base URL

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

/// Selectors for every element the scraper reads
pub(crate) struct PageSelectors {
    pub category_nav: Selector,
    pub link: Selector,
    pub article: Selector,
    pub catalogue_name: Selector,
    pub next_link: Selector,
    pub heading: Selector,
    pub details_table: Selector,
    pub table_row: Selector,
    pub row_label: Selector,
    pub row_value: Selector,
    pub carousel_image: Selector,
    pub description: Selector,
    pub breadcrumb_category: Selector,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

pub(crate) static SELECTORS: LazyLock<PageSelectors> = LazyLock::new(|| PageSelectors {
    category_nav: selector(".side_categories"),
    link: selector("a[href]"),
    article: selector("article"),
    catalogue_name: selector(".page-header.action"),
    next_link: selector(".next a[href]"),
    heading: selector("h1"),
    details_table: selector("table.table.table-striped"),
    table_row: selector("tr"),
    row_label: selector("th"),
    row_value: selector("td"),
    carousel_image: selector("div.item.active img[src]"),
    description: selector("#product_description ~ p"),
    breadcrumb_category: selector(".breadcrumb li:nth-child(3) a"),
});

/// Collects an element's text with surrounding whitespace removed
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only and empty hrefs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}

/// Resolves a product card href against the catalogue base path
///
/// Listing pages link products as `../../../slug_1/index.html`; the parent
/// segments are dropped so every product lands directly under the base.
pub fn resolve_product_link(href: &str, catalogue_base: &Url) -> Option<Url> {
    let mut relative = href.trim();
    while let Some(rest) = relative.strip_prefix("../") {
        relative = rest;
    }
    resolve_link(relative, catalogue_base)
}
