//! HTTP server for the enrichment API.
//!
//! # API Endpoints
//!
//! | Method | Path                 | Description                              |
//! |--------|----------------------|------------------------------------------|
//! | GET    | `/`                  | Upload page                              |
//! | GET    | `/health`            | Health check                             |
//! | POST   | `/process-csv/`      | Upload CSV, receive `processed2_<name>`  |
//! | GET    | `/create-sample-csv` | Write a sample CSV (`?file_path=`)       |
//! | GET    | `/download-csv`      | Download a CSV file (`?file_path=`)      |
//! | GET    | `/api/logs`          | SSE stream for real-time logs            |
//!
//! Each upload gets its own directory under the configured temp dir, so
//! concurrent requests never share files. `file_path` parameters are
//! relative to the configured data dir and may not leave it.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header, HeaderValue, Method},
    response::{sse::Event, Html, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::{
    convert::Infallible,
    path::{Component, Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::{AllowOrigin, CorsLayer};
use uuid::Uuid;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{health_body, FilePathQuery, MessageResponse};
use crate::config::AppConfig;
use crate::error::{ServerError, ServerResult};
use crate::sample::{write_sample, DEFAULT_SAMPLE_PATH};
use crate::transform::pipeline::{process_file, processed_file_name};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Name used when an upload carries no usable file name.
const FALLBACK_UPLOAD_NAME: &str = "upload.csv";

const NOT_FOUND_DETAIL: &str = "CSV file not found.";

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._ \-]").expect("valid file name pattern"));

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let allowed_origin = match HeaderValue::from_str(&state.config.origin()) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => AllowOrigin::list(Vec::<HeaderValue>::new()),
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/process-csv", post(process_csv))
        .route("/process-csv/", post(process_csv))
        .route("/create-sample-csv", get(create_sample_csv))
        .route("/download-csv", get(download_csv))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_address();
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("🚀 Pubtable server running on http://{}", addr);
    println!("   POST /process-csv/       - Upload CSV, receive enriched CSV");
    println!("   GET  /create-sample-csv  - Write sample CSV");
    println!("   GET  /download-csv       - Download a CSV file");
    println!("   GET  /api/logs           - SSE log stream");
    println!("   GET  /health             - Health check");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<Value> {
    Json(health_body())
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: multipart field `file` → enriched CSV attachment.
async fn process_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Response> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;
    let name = sanitize_file_name(file_name.as_deref());

    println!("\n{}", "=".repeat(70));
    println!("📄 NEW UPLOAD: {} ({} bytes)", name, bytes.len());
    println!("{}\n", "=".repeat(70));

    let request_dir = state.config.temp_dir.join(Uuid::new_v4().to_string());
    tokio::fs::create_dir_all(&request_dir).await?;
    let upload_path = request_dir.join(&name);
    tokio::fs::write(&upload_path, &bytes).await?;

    let processed_name = processed_file_name(&name);
    let output_path = request_dir.join(&processed_name);

    let output = tokio::task::spawn_blocking(move || process_file(&upload_path, &output_path))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(|e| {
            log_error(format!("Processing failed: {}", e));
            ServerError::from(e)
        })?;

    log_info(format!("📦 {} rows returned as {}", output.summary.rows, processed_name));

    Ok(csv_attachment(output.csv, &processed_name))
}

/// Write the sample table, to `data/sample_data.csv` unless a path is given.
async fn create_sample_csv(
    State(state): State<AppState>,
    Query(query): Query<FilePathQuery>,
) -> ServerResult<Json<MessageResponse>> {
    let raw = query.file_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());
    let path = state.config.data_dir.join(checked_path(&raw)?);

    tokio::task::spawn_blocking(move || write_sample(&path))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    Ok(Json(MessageResponse::new(format!("CSV file created at {}", raw))))
}

/// Return an existing CSV file as an attachment.
async fn download_csv(
    State(state): State<AppState>,
    Query(query): Query<FilePathQuery>,
) -> ServerResult<Response> {
    let raw = query
        .file_path
        .ok_or_else(|| ServerError::BadRequest("Missing file_path parameter".into()))?;
    let path = state.config.data_dir.join(checked_path(&raw)?);

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(ServerError::NotFound(NOT_FOUND_DETAIL.into())),
    }

    let bytes = tokio::fs::read(&path).await?;
    let name = sanitize_file_name(path.file_name().and_then(|n| n.to_str()));

    Ok(csv_attachment(bytes, &name))
}

fn csv_attachment(bytes: Vec<u8>, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Base name of an uploaded file with unsafe characters replaced by `_`.
pub fn sanitize_file_name(raw: Option<&str>) -> String {
    let base = raw
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .unwrap_or("");
    let cleaned = UNSAFE_FILE_CHARS.replace_all(base, "_").into_owned();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        FALLBACK_UPLOAD_NAME.to_string()
    } else {
        cleaned
    }
}

/// Accept only relative paths that stay below the data dir.
fn checked_path(raw: &str) -> ServerResult<PathBuf> {
    let path = Path::new(raw);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if raw.trim().is_empty() || escapes {
        return Err(ServerError::BadRequest(format!("Unsafe file path: {}", raw)));
    }
    Ok(path.to_path_buf())
}
