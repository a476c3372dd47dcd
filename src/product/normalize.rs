//! Field normalization helpers shared by the extractor and the export layout

use crate::product::Price;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a title slug used in file names
pub const SLUG_MAX_LEN: usize = 30;

static NON_PRICE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d.]").expect("valid price regex"));

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid digit regex"));

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid slug regex"));

/// Cleans a displayed price such as `"£45.20"` into a number
///
/// Every character that is not a digit or a decimal point is removed. An empty
/// or unparseable remainder yields [`Price::NotAvailable`].
///
/// # Example
///
/// ```
/// use book_scraper::product::{clean_price, Price};
///
/// assert_eq!(clean_price("£45.20"), Price::Amount(45.20));
/// assert_eq!(clean_price(""), Price::NotAvailable);
/// ```
pub fn clean_price(raw: &str) -> Price {
    let cleaned = NON_PRICE_CHARS.replace_all(raw, "");
    if cleaned.is_empty() {
        return Price::NotAvailable;
    }

    cleaned
        .parse::<f64>()
        .map(Price::Amount)
        .unwrap_or(Price::NotAvailable)
}

/// Extracts the first run of digits from an availability line
///
/// `"In stock (22 available)"` gives 22; text without digits gives 0.
pub fn parse_availability(raw: &str) -> u32 {
    DIGIT_RUN
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Turns a product title into a file-name-safe slug
///
/// Runs of non-alphanumeric characters collapse to `-`, the result is
/// lowercased and cut to [`SLUG_MAX_LEN`] characters.
pub fn slugify(title: &str) -> String {
    NON_ALPHANUMERIC_RUN
        .replace_all(title, "-")
        .to_lowercase()
        .chars()
        .take(SLUG_MAX_LEN)
        .collect()
}

/// Folder name for a catalogue: spaces become underscores
pub fn folder_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}
