//! Caja POS - point-of-sale server.
//!
//! Serves the POS cart API on the configured address. The product catalog
//! is loaded once at startup from `CAJA_CATALOG_PATH`; completed sales are
//! submitted to the backend at `CAJA_SALES_API_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caja_pos::catalog::Catalog;
use caja_pos::config::PosConfig;
use caja_pos::routes;
use caja_pos::session::create_session_layer;
use caja_pos::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = PosConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "caja_pos=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load the product catalog
    let catalog = Catalog::load(&config.catalog_path).expect("Failed to load catalog");
    tracing::info!(products = catalog.len(), "Catalog loaded");

    // Build application state and router
    let state = AppState::new(config.clone(), catalog);
    let app = routes::router(state)
        .layer(create_session_layer())
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("caja-pos listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
