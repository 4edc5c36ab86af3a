//! Error types for the pubtable enrichment service.
//!
//! - [`CsvError`] - loading or serializing delimited text
//! - [`ConfigError`] - invalid runtime configuration
//! - [`PipelineError`] - load → enrich → serialize orchestration
//! - [`ServerError`] - HTTP boundary failures, mapped to status codes
//!
//! The enricher itself never fails: malformed DOIs, unmapped journal codes
//! and missing columns all resolve to null cells. Only the I/O boundary
//! produces errors, and `From` conversions let `?` cross each layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::api::types::error_body;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading or writing delimited text.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read or write a file.
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Input contained no header line.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A data row carried more fields than the header declares.
    #[error("Line {line}: expected {expected} fields, saw {found}")]
    Malformed {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Low-level CSV syntax or writer failure.
    #[error("Invalid CSV format: {0}")]
    Format(#[from] csv::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Errors from the load → enrich → serialize pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The upload could not be read as delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Temporary or output file handling failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP boundary errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Malformed request (bad multipart body, missing field, unsafe path).
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Requested file does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Pipeline failure.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Pipeline(PipelineError::Csv(CsvError::Io(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::Pipeline(PipelineError::Csv(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Pipeline(PipelineError::Io(_)) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(error_body(&self.to_string()))).into_response()
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
