use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopsync_core::{
    load_config, validate_config, CursorStore, FileCursorStore, OrderFetcher, OrderProxy,
    OrderSync, ShopwareClient, TokenProvider,
};
use shopsync_server::api::create_router;
use shopsync_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
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

    // Determine config path
    let config_path = std::env::var("SHOPSYNC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Shop base URL: {}", config.shop.base_url);
    info!("Cursor path: {:?}", config.cursor.path);
    info!(
        "Staleness window: {} hours",
        config.sync.staleness_window_hours
    );
    if config.shop.static_token.is_none() {
        info!("No static token configured, proxy routes will request tokens per call");
    }

    // Create cursor store
    let cursor_store: Arc<dyn CursorStore> = Arc::new(FileCursorStore::new(&config.cursor.path));
    match cursor_store.read().await {
        Ok(Some(cursor)) => info!("Existing cursor: {}", cursor),
        Ok(None) => info!("No cursor stored yet, first sync will take every order"),
        Err(e) => warn!("Cursor is unreadable, syncs will fail until it is fixed: {}", e),
    }

    // Create shop client
    let shop = Arc::new(
        ShopwareClient::new(&config.shop).context("Failed to create shop API client")?,
    );
    info!(
        "Shop client initialized (timeout: {}s)",
        config.shop.timeout_secs
    );

    let sync = Arc::new(OrderSync::new(
        config.sync.clone(),
        config.shop.credentials(),
        cursor_store,
        Arc::clone(&shop) as Arc<dyn TokenProvider>,
        Arc::clone(&shop) as Arc<dyn OrderFetcher>,
    ));

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        sync,
        shop as Arc<dyn OrderProxy>,
    ));

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

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
