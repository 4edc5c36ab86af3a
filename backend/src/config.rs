//! Runtime configuration.
//!
//! Values come from built-in defaults, then environment variables (a `.env`
//! file is honoured through `dotenvy`), then CLI flags applied by `main`.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default bind address. Matches a local-only development server.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// Directory receiving uploads and processed files.
pub const DEFAULT_TEMP_DIR: &str = "temp";

/// Root that `file_path` query parameters are resolved against.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Maximum accepted upload size (50 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const ENV_HOST: &str = "PUBTABLE_HOST";
const ENV_PORT: &str = "PUBTABLE_PORT";
const ENV_TEMP_DIR: &str = "PUBTABLE_TEMP_DIR";
const ENV_DATA_DIR: &str = "PUBTABLE_DATA_DIR";
const ENV_MAX_UPLOAD: &str = "PUBTABLE_MAX_UPLOAD_BYTES";

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub temp_dir: PathBuf,
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(dir) = lookup(ENV_TEMP_DIR).filter(|v| !v.trim().is_empty()) {
            config.temp_dir = PathBuf::from(dir.trim());
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(limit) = lookup(ENV_MAX_UPLOAD) {
            config.max_upload_bytes =
                limit.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name: ENV_MAX_UPLOAD,
                    value: limit.clone(),
                })?;
        }

        Ok(config)
    }

    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origin the upload page is served from.
    pub fn origin(&self) -> String {
        format!("http://{}", self.bind_address())
    }
}
