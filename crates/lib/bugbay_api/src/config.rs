//! API server configuration.

use std::path::PathBuf;

use bugbay_core::auth::token::resolve_auth_secret;
use bugbay_core::storage::DEFAULT_MAX_UPLOAD_BYTES;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3200").
    pub bind_addr: String,
    /// Public base URL embedded in download links.
    pub base_url: String,
    /// Token signing secret.
    pub auth_secret: String,
    /// Directory holding attachment bytes.
    pub upload_dir: PathBuf,
    /// Upload size ceiling in bytes.
    pub max_upload_bytes: u64,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                       | Default                        |
    /// |--------------------------------|--------------------------------|
    /// | `BIND_ADDR`                    | `127.0.0.1:3200`               |
    /// | `BASE_URL`                     | `http://<BIND_ADDR>`           |
    /// | `BUGBAY_SECRET` / `AUTH_SECRET`| generated & persisted to file  |
    /// | `UPLOAD_DIR`                   | `./uploads`                    |
    /// | `MAX_UPLOAD_BYTES`             | `5242880` (5 MiB)              |
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3200".into());
        Self {
            base_url: std::env::var("BASE_URL").unwrap_or_else(|_| format!("http://{bind_addr}")),
            bind_addr,
            auth_secret: resolve_auth_secret(),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}
