//! Export record trait and error types
//!
//! Anything written by [`write_csv`](crate::output::write_csv) exposes its
//! column names and values through [`CsvRecord`].

use thiserror::Error;

/// Errors that can occur during export operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    EmptyBatch,

    #[error("Record {index} has fields {found:?}, expected {expected:?}")]
    FieldMismatch {
        /// 1-based position of the offending record in the batch
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// A record with named fields that can be written as one CSV row
pub trait CsvRecord {
    /// Column names, in output order
    fn field_names(&self) -> Vec<&str>;

    /// Column values, aligned with [`field_names`](CsvRecord::field_names)
    fn field_values(&self) -> Vec<String>;
}

/// Free-form ordered record, for exports that do not map to a fixed schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, replacing the value if the name already exists
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }
}

impl CsvRecord for Row {
    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    fn field_values(&self) -> Vec<String> {
        self.fields.iter().map(|(_, v)| v.clone()).collect()
    }
}
