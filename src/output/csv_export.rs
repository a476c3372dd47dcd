//! CSV serialization of record batches

use crate::output::traits::{CsvRecord, ExportError, ExportResult};
use std::path::Path;

/// Writes a batch of records to a CSV file
///
/// The header is taken from the first record and every later record must
/// expose the identical field list. The whole batch is checked and serialized
/// in memory before the destination is touched, so a rejected batch leaves no
/// file behind. Parent folders are created as needed.
///
/// # Arguments
///
/// * `path` - Destination CSV file
/// * `records` - Records to write, one row each
///
/// # Returns
///
/// * `Ok(usize)` - Number of data rows written
/// * `Err(ExportError)` - Empty or heterogeneous batch, or an IO failure
pub fn write_csv<R: CsvRecord>(path: &Path, records: &[R]) -> ExportResult<usize> {
    let first = records.first().ok_or(ExportError::EmptyBatch)?;
    let header = first.field_names();

    for (idx, record) in records.iter().enumerate().skip(1) {
        let names = record.field_names();
        if names != header {
            return Err(ExportError::FieldMismatch {
                index: idx + 1,
                expected: header.iter().map(|s| s.to_string()).collect(),
                found: names.iter().map(|s| s.to_string()).collect(),
            });
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;
    for record in records {
        writer.write_record(record.field_values())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;

    tracing::info!("CSV exported: {} ({} rows)", path.display(), records.len());

    Ok(records.len())
}
