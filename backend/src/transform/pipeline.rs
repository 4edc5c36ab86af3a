//! Load → enrich → serialize.
//!
//! Thin orchestration around [`enrich`]: decode the upload, run the enricher,
//! write the result back to CSV, and report each step through the log
//! broadcaster.
//!
//! # Example
//!
//! ```rust,ignore
//! use pubtable::transform::pipeline::process_file;
//! use std::path::Path;
//!
//! let output = process_file(Path::new("papers.csv"), Path::new("processed2_papers.csv"))?;
//! println!("Enriched {} rows", output.summary.rows);
//! ```

use serde::Serialize;
use std::path::Path;

use super::authors::author_slots;
use super::enricher::enrich;
use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::error::PipelineResult;
use crate::models::{cell_is_blank, Table, COL_DOI, COL_JOURNAL_NAME, COL_YEAR_PUBLISHED};
use crate::parser::{parse_bytes_auto, ParseResult};
use crate::writer::to_csv_bytes;

/// Prefix of processed file names.
pub const PROCESSED_PREFIX: &str = "processed2_";

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// What the enricher managed to derive.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EnrichSummary {
    /// Rows in the output (always equal to the input row count).
    pub rows: usize,
    /// Rows with a non-empty DOI.
    pub with_doi: usize,
    /// Rows whose journal code resolved to a name.
    pub journals_resolved: usize,
    /// Rows without a year; these sort after dated rows.
    pub undated: usize,
    /// Complete author column triples found in the input.
    pub author_slots: usize,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub table: Table,
    pub csv: Vec<u8>,
    pub csv_info: CsvInfo,
    pub summary: EnrichSummary,
}

/// `processed2_<name>`
pub fn processed_file_name(name: &str) -> String {
    format!("{}{}", PROCESSED_PREFIX, name)
}

/// Run the pipeline on raw uploaded bytes.
pub fn process_bytes(bytes: &[u8]) -> PipelineResult<ProcessOutput> {
    log_info("📖 Reading CSV...");
    let parsed = parse_bytes_auto(bytes)?;
    process_parsed(parsed)
}

/// Read `input`, run the pipeline and write the CSV to `output`.
pub fn process_file(input: &Path, output: &Path) -> PipelineResult<ProcessOutput> {
    let bytes = std::fs::read(input)?;
    let result = process_bytes(&bytes)?;
    std::fs::write(output, &result.csv)?;
    log_success(format!("💾 Written to {}", output.display()));
    Ok(result)
}

fn process_parsed(parsed: ParseResult) -> PipelineResult<ProcessOutput> {
    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.table.columns.clone(),
        row_count: parsed.table.len(),
    };
    log_success(format!("Detected encoding: {}", csv_info.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(csv_info.delimiter)));
    log_success(format!("Read {} rows, {} columns", csv_info.row_count, csv_info.headers.len()));
    for (i, col) in csv_info.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    let slots = author_slots(&parsed.table).len();
    if !parsed.table.has_column(COL_DOI) {
        log_warning("No DOI column: bibliographic fields will stay empty");
    }

    log_info("⚙️  Enriching records...");
    let table = enrich(parsed.table);
    let summary = summarize(&table, slots);
    log_success(format!(
        "{} rows, {} with DOI, {} journals resolved, {} author slot(s)",
        summary.rows, summary.with_doi, summary.journals_resolved, summary.author_slots
    ));
    if summary.undated > 0 {
        log_warning(format!("{} row(s) without a year sorted last", summary.undated));
    }

    let csv = to_csv_bytes(&table)?;

    Ok(ProcessOutput {
        table,
        csv,
        csv_info,
        summary,
    })
}

/// Count derived fields in an enriched table.
pub fn summarize(table: &Table, author_slots: usize) -> EnrichSummary {
    let count = |column: &str| {
        table
            .column_values(column)
            .into_iter()
            .filter(|v| !cell_is_blank(v))
            .count()
    };

    EnrichSummary {
        rows: table.len(),
        with_doi: count(COL_DOI),
        journals_resolved: count(COL_JOURNAL_NAME),
        undated: table.len() - count(COL_YEAR_PUBLISHED),
        author_slots,
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}
