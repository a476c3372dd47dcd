//! Product record model
//!
//! One [`ProductRecord`] is produced per product page visit. Its column set is
//! fixed, so every record in an export batch shares the same CSV header.

mod normalize;
mod record;

pub use normalize::{clean_price, folder_name, parse_availability, slugify, SLUG_MAX_LEN};
pub use record::{Price, ProductRecord, PRODUCT_FIELDS};

/// Placeholder written when an expected field cannot be extracted
pub const NOT_AVAILABLE: &str = "N/A";
