//! Table serializer: the inverse of the loader.
//!
//! Writes a header row in [`Table::columns`] order followed by one line per
//! row. Null cells become empty fields; fields are quoted when needed.

use csv::WriterBuilder;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{cell_to_string, Table};

/// Serialize a table to comma-separated bytes.
pub fn to_csv_bytes(table: &Table) -> CsvResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .from_writer(Vec::new());

    writer.write_record(&table.columns)?;

    for row in &table.rows {
        let fields = table
            .columns
            .iter()
            .map(|col| row.get(col).map(cell_to_string).unwrap_or_default());
        writer.write_record(fields)?;
    }

    writer.into_inner().map_err(|e| CsvError::Io(e.into_error()))
}

/// Serialize a table and write it to `path`.
pub fn write_csv_file<P: AsRef<Path>>(table: &Table, path: P) -> CsvResult<()> {
    let bytes = to_csv_bytes(table)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
