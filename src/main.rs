//! Federation Dashboard - server entry point

use std::net::SocketAddr;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;

use federation_dashboard::{Config, create_app, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        // Only warn if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Load and validate configuration
    let config = Config::load().map_err(|e| {
        std::io::Error::other(format!(
            "Failed to load configuration. Check DATABASE_URL and DASHBOARD__* env vars: {}",
            e
        ))
    })?;

    init_tracing(&config.logging).map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!("Starting federation dashboard...");
    tracing::info!(
        mode = ?config.server.mode,
        version_manager = config.dashboard.version_manager,
        "Configuration loaded: server={}:{}",
        config.server.host,
        config.server.port
    );

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    let enable_docs = config.server.enable_docs;
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);

    let app_handle = create_app(config).await.map_err(|e| {
        Box::new(std::io::Error::other(format!(
            "Failed to create application: {}",
            e
        )))
    })?;

    let addr = SocketAddr::new(server_host.parse()?, server_port);

    tracing::info!("Server listening on {}", addr);
    if enable_docs {
        tracing::info!(
            "OpenAPI document available at http://{}/api-docs/openapi.json",
            addr
        );
    }

    let shutdown_token = app_handle.shutdown_token.clone();
    tokio::spawn(shutdown_signal(shutdown_token.clone()));

    let listener = TcpListener::bind(addr).await?;
    let server = axum::serve(
        listener,
        app_handle
            .router
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_token.clone().cancelled_owned());

    tokio::select! {
        result = async { server.await } => result?,
        _ = drain_deadline(shutdown_token, shutdown_timeout) => {
            tracing::warn!("Shutdown grace period elapsed, dropping in-flight requests");
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves `timeout` after shutdown started
async fn drain_deadline(shutdown_token: CancellationToken, timeout: Duration) {
    shutdown_token.cancelled().await;
    tokio::time::sleep(timeout).await;
}

/// Cancel the shutdown token on Ctrl+C or SIGTERM
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }

    shutdown_token.cancel();
}
