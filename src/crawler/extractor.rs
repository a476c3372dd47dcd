//! Product detail page extraction

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{element_text, resolve_link, SELECTORS};
use crate::product::{clean_price, parse_availability, ProductRecord};
use crate::{Result, ScrapeError};
use scraper::Html;
use url::Url;

/// Parses a product detail page into a normalized record
///
/// Details table rows are mapped onto the fixed record schema:
///
/// | Row label | Field |
/// |-----------|-------|
/// | UPC | `upc` |
/// | Price (incl. tax) | `price_including_tax` |
/// | Price (excl. tax) | `price_excluding_tax` |
/// | Availability | `number_available` |
/// | Number of reviews | `review_rating` |
///
/// Any other row is dropped.
///
/// # Errors
///
/// `ScrapeError::Extract` when the page has no heading or no details table.
pub fn parse_product_page(html: &str, page_url: &Url) -> Result<ProductRecord> {
    let document = Html::parse_document(html);

    let title = document
        .select(&SELECTORS.heading)
        .next()
        .map(element_text)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| ScrapeError::extract(page_url.as_str(), "product heading not found"))?;

    let table = document
        .select(&SELECTORS.details_table)
        .next()
        .ok_or_else(|| ScrapeError::extract(page_url.as_str(), "details table not found"))?;

    let mut record = ProductRecord::new(page_url.as_str(), title);

    for row in table.select(&SELECTORS.table_row) {
        let (Some(label), Some(value)) = (
            row.select(&SELECTORS.row_label).next().map(element_text),
            row.select(&SELECTORS.row_value).next().map(element_text),
        ) else {
            continue;
        };

        match label.as_str() {
            "UPC" => record.upc = value,
            "Price (incl. tax)" => record.price_including_tax = clean_price(&value),
            "Price (excl. tax)" => record.price_excluding_tax = clean_price(&value),
            "Availability" => record.number_available = Some(parse_availability(&value)),
            "Number of reviews" => record.review_rating = value,
            other => tracing::trace!("Dropping details row '{}'", other),
        }
    }

    if let Some(description) = document
        .select(&SELECTORS.description)
        .next()
        .map(element_text)
    {
        record.product_description = description;
    }

    if let Some(category) = document
        .select(&SELECTORS.breadcrumb_category)
        .next()
        .map(element_text)
    {
        record.category = category;
    }

    record.image_url = document
        .select(&SELECTORS.carousel_image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| resolve_link(src, page_url))
        .map(String::from);

    Ok(record)
}

/// Fetches a product page and extracts its record
pub async fn extract_product(fetcher: &Fetcher, url: &Url) -> Result<ProductRecord> {
    let html = fetcher.fetch_page(url.as_str()).await?;
    let record = parse_product_page(&html, url)?;
    tracing::debug!("Extracted '{}' from {}", record.title, url);
    Ok(record)
}
