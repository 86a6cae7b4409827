//! glow-cms (Content Management) - Layout persistence and analytics service
//!
//! Serves the digital-layout and engagement-analytics endpoints for the
//! Glow platform. Zero-config startup: the database is created and
//! migrated on first run inside the resolved data folder.

use anyhow::Result;
use clap::Parser;
use glow_common::config::{self, ServiceConfig, DEFAULT_PORT};
use glow_cms::{build_router, AppState};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Glow content management service")]
struct Cli {
    /// Folder holding the service database (overrides GLOW_DATA_FOLDER and config file)
    #[arg(long)]
    data_folder: Option<String>,

    /// HTTP listen port
    #[arg(long, env = "GLOW_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber before anything else
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Glow CMS (glow-cms) v{}", env!("CARGO_PKG_VERSION"));

    // 4-tier resolution: CLI > env > config file > platform default
    let data_folder =
        config::resolve_data_folder(cli.data_folder.as_deref(), "GLOW_DATA_FOLDER");
    let port = cli
        .port
        .or_else(config::config_file_port)
        .unwrap_or(DEFAULT_PORT);

    let service_config = ServiceConfig { data_folder, port };
    service_config.ensure_data_folder()?;

    let db_path = service_config.database_path();
    info!("Database path: {}", db_path.display());

    let pool = glow_common::db::init_database(&db_path).await?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", service_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("glow-cms listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
