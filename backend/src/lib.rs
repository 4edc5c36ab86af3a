//! # Pubtable - publication metadata enrichment
//!
//! Pubtable takes a spreadsheet of publications, derives the bibliographic
//! fields encoded in each DOI (journal, year, volume, issue, article number,
//! resolver URL), folds per-author columns into one author list and returns
//! the rows in citation order.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Enricher   │────▶│   Writer    │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (DOI, sort) │     │    (CSV)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pubtable::{enrich, parse_file_auto, to_csv_bytes};
//!
//! let parsed = parse_file_auto("papers.csv")?;
//! let table = enrich(parsed.table);
//! std::fs::write("processed2_papers.csv", to_csv_bytes(&table)?)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Runtime configuration
//! - [`models`] - Table model and output schema
//! - [`parser`] - CSV loading with auto-detection
//! - [`writer`] - CSV serialization
//! - [`transform`] - Enricher and pipeline
//! - [`sample`] - Sample data
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Input / output
pub mod parser;
pub mod writer;

// Transformation
pub mod transform;

pub mod sample;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors and configuration
// =============================================================================

pub use config::AppConfig;
pub use error::{ConfigError, CsvError, PipelineError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Record, Table, FIXED_COLUMNS};

// =============================================================================
// Re-exports - CSV
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto,
    parse_str, ParseResult,
};
pub use writer::{to_csv_bytes, write_csv_file};

// =============================================================================
// Re-exports - Enricher
// =============================================================================

pub use transform::{
    enrich, journal_name, journals_description, process_bytes, process_file,
    processed_file_name, CsvInfo, Doi, EnrichSummary, ProcessOutput, SortKey,
};

pub use sample::{sample_table, write_sample};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
