use crate::output::CsvRecord;
use crate::product::NOT_AVAILABLE;
use std::fmt;

/// CSV columns of a product record, in output order
pub const PRODUCT_FIELDS: [&str; 10] = [
    "product_page_url",
    "universal_product_code (upc)",
    "title",
    "price_including_tax",
    "price_excluding_tax",
    "number_available",
    "product_description",
    "category",
    "review_rating",
    "image_url",
];

/// A cleaned price, or the sentinel when the page showed none
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Amount(f64),
    NotAvailable,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(value) => write!(f, "{:.2}", value),
            Price::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Normalized fields of one product detail page
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub product_page_url: String,
    pub upc: String,
    pub title: String,
    pub price_including_tax: Price,
    pub price_excluding_tax: Price,
    /// `None` when the details table had no availability row
    pub number_available: Option<u32>,
    pub product_description: String,
    pub category: String,
    pub review_rating: String,
    /// Absolute cover image URL, if the carousel had one
    pub image_url: Option<String>,
}

impl ProductRecord {
    /// Creates a record with every optional field set to the sentinel
    pub fn new(product_page_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            product_page_url: product_page_url.into(),
            upc: NOT_AVAILABLE.to_string(),
            title: title.into(),
            price_including_tax: Price::NotAvailable,
            price_excluding_tax: Price::NotAvailable,
            number_available: None,
            product_description: NOT_AVAILABLE.to_string(),
            category: NOT_AVAILABLE.to_string(),
            review_rating: NOT_AVAILABLE.to_string(),
            image_url: None,
        }
    }
}

impl CsvRecord for ProductRecord {
    fn field_names(&self) -> Vec<&str> {
        PRODUCT_FIELDS.to_vec()
    }

    fn field_values(&self) -> Vec<String> {
        vec![
            self.product_page_url.clone(),
            self.upc.clone(),
            self.title.clone(),
            self.price_including_tax.to_string(),
            self.price_excluding_tax.to_string(),
            self.number_available
                .map(|n| n.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            self.product_description.clone(),
            self.category.clone(),
            self.review_rating.clone(),
            self.image_url
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ]
    }
}
