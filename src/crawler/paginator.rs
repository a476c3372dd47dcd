//! Catalogue pagination
//!
//! A catalogue is walked page by page, following the "next" control until a
//! page has none, collecting every product card link along the way.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{element_text, resolve_link, resolve_product_link, SELECTORS};
use crate::{Result, ScrapeError};
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Product links and display name of one catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueLinks {
    pub name: String,
    pub product_links: Vec<Url>,
}

/// Everything read from a single listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CataloguePage {
    pub name: String,
    pub product_links: Vec<Url>,
    pub next_page: Option<Url>,
}

/// Parses one listing page
///
/// # Arguments
///
/// * `html` - The listing page content
/// * `page_url` - URL of this page, used to resolve the "next" link
/// * `catalogue_base` - Base path product links are resolved against
///
/// # Errors
///
/// `ScrapeError::Parse` if the catalogue heading is missing or a product card
/// has no usable link.
pub fn parse_catalogue_page(html: &str, page_url: &Url, catalogue_base: &Url) -> Result<CataloguePage> {
    let document = Html::parse_document(html);

    let name = document
        .select(&SELECTORS.catalogue_name)
        .next()
        .map(element_text)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ScrapeError::parse(page_url.as_str(), "catalogue heading not found"))?;

    let mut product_links = Vec::new();
    for article in document.select(&SELECTORS.article) {
        let link = article
            .select(&SELECTORS.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_product_link(href, catalogue_base))
            .ok_or_else(|| ScrapeError::parse(page_url.as_str(), "product card without link"))?;
        product_links.push(link);
    }

    let next_page = document
        .select(&SELECTORS.next_link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_link(href, page_url));

    Ok(CataloguePage {
        name,
        product_links,
        next_page,
    })
}

/// Walks a catalogue from its first page and collects every product link
///
/// The catalogue name is re-read on each page and the last value is kept;
/// pages of one catalogue are assumed to share the same heading.
///
/// # Errors
///
/// Fetch and parse failures on any page abort the walk. A "next" link that
/// points back at an already visited page is reported as a parse error.
pub async fn collect_catalogue(
    fetcher: &Fetcher,
    first_page: &Url,
    catalogue_base: &Url,
) -> Result<CatalogueLinks> {
    let mut visited = HashSet::new();
    let mut product_links = Vec::new();
    let mut name: String;
    let mut current = first_page.clone();

    loop {
        visited.insert(current.clone());

        let html = fetcher.fetch_page(current.as_str()).await?;
        let page = parse_catalogue_page(&html, &current, catalogue_base)?;

        tracing::debug!(
            "{}: {} product links on {}",
            page.name,
            page.product_links.len(),
            current
        );

        name = page.name;
        product_links.extend(page.product_links);

        match page.next_page {
            Some(next) if visited.contains(&next) => {
                return Err(ScrapeError::parse(
                    current.as_str(),
                    format!("pagination loops back to {}", next),
                ));
            }
            Some(next) => current = next,
            None => break,
        }
    }

    tracing::info!(
        "Catalogue '{}': {} products over {} pages",
        name,
        product_links.len(),
        visited.len()
    );

    Ok(CatalogueLinks {
        name,
        product_links,
    })
}
