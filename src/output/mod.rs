//! Output module for exporting scraped records
//!
//! This module handles:
//! - Serializing homogeneous record batches to CSV
//! - Choosing folder and file names per export scope
//! - Collision-free image file names
//! - Recording run statistics

mod csv_export;
mod layout;
pub mod stats;
mod traits;

pub use csv_export::write_csv;
pub use layout::{date_stamp, time_stamp, ExportPaths, ExportScope, ImageNamer};
pub use stats::{print_summary, ItemFailure, RunSummary};
pub use traits::{CsvRecord, ExportError, ExportResult, Row};
