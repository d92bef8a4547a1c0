//! Gemini Relay - stateless forwarding proxy for the Gemini API
//!
//! This is the main entry point for the relay server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tracing::{info, warn};

use gemini_relay::{routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing (LOG_FORMAT=json for machine-readable output)
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_relay=info,tower_http=info".into()),
        )
        .with_target(true)
        .with_thread_ids(true);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting Gemini API relay");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        upstream = %config.gemini_api_url,
        timeout_secs = config.upstream_timeout_secs,
        max_body_bytes = config.max_body_bytes,
        "Configuration loaded successfully"
    );

    // Initialize application state
    let state = Arc::new(AppState::new(config.clone())?);

    // Build the router
    let app = routes::create_router(state);

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Listening on {}", addr);
    info!("Health check: GET http://{}/health", addr);
    info!("Proxy endpoint: POST http://{}/proxy/gemini/{{modelName}}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating shutdown");
        }
    }
}
