//! smp-admin - Membership Portal Admin Backend
//!
//! CRUD backend for units, committee members and programs, with the unit
//! scoring and ranking pipeline. Stored photos are served as static files
//! under /photos/.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::info;

use smp_admin::services::storage::LocalPhotoStore;
use smp_admin::AppState;

#[derive(Parser, Debug)]
#[command(name = "smp-admin", about = "Membership portal admin backend")]
struct Args {
    /// Data directory (overrides SMP_DATA_DIR and the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5810)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Membership Portal Admin (smp-admin) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    // Resolve and prepare the data directory (CLI > env > config > default)
    let data_dir = smp_common::config::resolve_data_dir(args.data_dir.as_deref());
    smp_common::config::ensure_data_dir(&data_dir)?;
    info!("Data directory: {}", data_dir.display());

    let db_path = smp_common::config::database_path(&data_dir);
    info!("Database path: {}", db_path.display());

    let pool = smp_admin::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let photos_root = smp_common::config::photos_dir(&data_dir);
    let photos = Arc::new(LocalPhotoStore::new(photos_root.clone()));

    // Application state starts the rank recomputation worker
    let state = AppState::new(pool, photos);

    let app = smp_admin::build_router(state)
        .nest_service("/photos", ServeDir::new(photos_root));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("smp-admin listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
