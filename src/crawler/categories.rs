//! Category discovery from the store's landing page

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{resolve_link, SELECTORS};
use crate::{Result, ScrapeError};
use scraper::Html;
use url::Url;

/// Extracts every category link from the landing page's navigation block
///
/// The first entry is the site-wide "Books" listing, which callers skip when
/// iterating real categories.
///
/// # Errors
///
/// `ScrapeError::Parse` if the page has no category navigation block.
pub fn parse_category_links(html: &str, root_url: &Url) -> Result<Vec<Url>> {
    let document = Html::parse_document(html);

    let nav = document
        .select(&SELECTORS.category_nav)
        .next()
        .ok_or_else(|| ScrapeError::parse(root_url.as_str(), "category navigation not found"))?;

    Ok(nav
        .select(&SELECTORS.link)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_link(href, root_url))
        .collect())
}

/// Fetches the landing page and lists its category links
///
/// A missing navigation block is logged and yields an empty list; a fetch
/// failure is returned to the caller.
pub async fn list_categories(fetcher: &Fetcher, root_url: &Url) -> Result<Vec<Url>> {
    let html = fetcher.fetch_page(root_url.as_str()).await?;

    match parse_category_links(&html, root_url) {
        Ok(links) => {
            tracing::info!("Found {} category links on {}", links.len(), root_url);
            Ok(links)
        }
        Err(e) => {
            tracing::warn!("No categories found: {}", e);
            Ok(Vec::new())
        }
    }
}
