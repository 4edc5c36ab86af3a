//! JSON bodies returned by the HTTP API.
//!
//! Successful processing returns CSV, not JSON; these types cover the
//! auxiliary endpoints and every error.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query string carrying a file path (`?file_path=...`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilePathQuery {
    pub file_path: Option<String>,
}

/// Error body: `{"status": "error", "detail": ...}`.
pub fn error_body(detail: &str) -> Value {
    json!({
        "status": "error",
        "detail": detail,
    })
}

/// Health check body.
pub fn health_body() -> Value {
    json!({
        "status": "ok",
        "service": "pubtable",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "process": "POST /process-csv/",
            "sample": "GET /create-sample-csv",
            "download": "GET /download-csv",
            "logs": "GET /api/logs (SSE)"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = error_body("CSV file not found.");
        assert_eq!(body["status"], "error");
        assert_eq!(body["detail"], "CSV file not found.");
    }

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_value(MessageResponse::new("CSV file created at data/x.csv")).unwrap();
        assert_eq!(json, json!({"message": "CSV file created at data/x.csv"}));
    }

    #[test]
    fn test_health_body() {
        let body = health_body();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "pubtable");
    }
}
