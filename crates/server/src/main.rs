use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overdub_core::{
    load_config, validate_config, Cleaner, CleanerBackend, Config, CredentialManager, FsCleaner,
    KvStore, MediaBridge, PipelineOrchestrator, SqliteKvStore,
};

use overdub_server::api::create_router;
use overdub_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("overdub v{} starting", VERSION);

    // Load configuration. An explicit OVERDUB_CONFIG path must exist;
    // the implicit ./config.toml is optional and defaults apply without it.
    let config = match std::env::var("OVERDUB_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        Err(_) => {
            let path = PathBuf::from("config.toml");
            if path.exists() {
                info!("Loading configuration from {:?}", path);
                load_config(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))?
            } else {
                info!("No config file found, using defaults");
                Config::default()
            }
        }
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Create SQLite key-value store
    let store: Arc<dyn KvStore> = Arc::new(
        SqliteKvStore::new(Path::new(&config.database.path))
            .context("Failed to open database")?,
    );
    info!("Key-value store initialized");

    // Create credential manager and load persisted pools
    let credentials = Arc::new(CredentialManager::new(Arc::clone(&store)));
    credentials
        .hydrate()
        .await
        .context("Failed to load credential pools")?;
    info!("Credential pools loaded");

    // Create the media bridge (downloader, translator, synthesizer, composer)
    info!("Media bridge at {}", config.services.bridge.url);
    let bridge = Arc::new(MediaBridge::new(config.services.bridge.clone()));

    // Create cleaner backend
    let cleaner: Arc<dyn Cleaner> = match config.services.cleaner {
        CleanerBackend::Bridge => {
            info!("Using bridge cleaner");
            bridge.clone()
        }
        CleanerBackend::Fs => {
            info!("Using filesystem cleaner");
            Arc::new(FsCleaner::new())
        }
    };

    // Create pipeline orchestrator
    let orchestrator = Arc::new(PipelineOrchestrator::new(
        config.pipeline.clone(),
        Arc::clone(&credentials),
        bridge.clone(),
        bridge.clone(),
        bridge.clone(),
        bridge.clone(),
        cleaner,
    ));
    info!("Pipeline orchestrator initialized");

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), orchestrator, credentials));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
