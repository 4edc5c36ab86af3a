//! Demonstration table for trying the enricher without real data.

use serde_json::Value;
use std::path::Path;

use crate::error::CsvResult;
use crate::models::{Record, Table, COL_DOI, COL_TITLE};
use crate::writer::write_csv_file;

/// Where the sample is written when no path is given.
pub const DEFAULT_SAMPLE_PATH: &str = "data/sample_data.csv";

const SAMPLE_ROWS: [(&str, &str, &str); 3] = [
    (
        "The Impacts of the use of Thematic & Chronologic Multi-modal Information Representation on Sequential and Global Students’ Historical Understanding",
        "236",
        "10.33093/jiwe.2022.1.1.4",
    ),
    ("Bob", "250", "10.33093/jiwe.2022.1.1.1"),
    ("Charlie", "264", "10.33093/jiwe.2022.1.1.5"),
];

/// Three rows with `Title`, `Submission ID` and `DOI`, deliberately unsorted.
pub fn sample_table() -> Table {
    let mut table = Table::new(vec![
        COL_TITLE.to_string(),
        "Submission ID".to_string(),
        COL_DOI.to_string(),
    ]);

    for (title, submission, doi) in SAMPLE_ROWS {
        let mut row = Record::new();
        row.insert(COL_TITLE.to_string(), Value::from(title));
        row.insert("Submission ID".to_string(), Value::from(submission));
        row.insert(COL_DOI.to_string(), Value::from(doi));
        table.push_row(row);
    }

    table
}

/// Write the sample table to `path`, creating parent directories.
pub fn write_sample<P: AsRef<Path>>(path: P) -> CsvResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_csv_file(&sample_table(), path)
}
