//! Bugbay API server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use bugbay_api::config::ApiConfig;
use bugbay_core::auth::token::resolve_auth_secret;
use bugbay_core::auth::users::UserDirectory;
use bugbay_core::notify::LogNotifier;
use bugbay_core::reports::repository::ReportRepository;
use bugbay_core::storage::{DEFAULT_MAX_UPLOAD_BYTES, FileStore, StoreConstraints};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "bugbay_server", about = "Bugbay bug-report API server")]
struct Args {
    /// Address to bind (0 port = ephemeral).
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3200")]
    bind_addr: String,

    /// Public base URL embedded in download links. Defaults to the bound
    /// address.
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Directory holding attachment bytes.
    #[arg(long, env = "UPLOAD_DIR", default_value = "./uploads")]
    upload_dir: PathBuf,

    /// Upload size ceiling in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bugbay_api=debug,bugbay_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(bind_addr = %args.bind_addr, upload_dir = %args.upload_dir.display(), "starting bugbay_server");

    let config = ApiConfig {
        base_url: args
            .base_url
            .unwrap_or_else(|| format!("http://{}", args.bind_addr)),
        bind_addr: args.bind_addr,
        auth_secret: resolve_auth_secret(),
        upload_dir: args.upload_dir.clone(),
        max_upload_bytes: args.max_upload_bytes,
    };

    let state = bugbay_api::AppState {
        repo: Arc::new(ReportRepository::new()),
        files: Arc::new(FileStore::new(
            args.upload_dir,
            StoreConstraints {
                max_size: args.max_upload_bytes,
                ..StoreConstraints::default()
            },
        )),
        users: Arc::new(UserDirectory::seeded_from_env()?),
        notifier: Arc::new(LogNotifier),
        config: config.clone(),
    };

    let app = bugbay_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
