//! HTTP API module.
//!
//! The file-transfer boundary around the enricher: upload page, processing
//! endpoint, sample generator, download endpoint and a live log stream.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server, AppState};
pub use types::*;
