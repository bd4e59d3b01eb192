//! TrackFlow Server - Main entry point.
//!
//! This binary starts the TrackFlow event relay with:
//! - Structured JSON logging for production
//! - Graceful shutdown handling (SIGTERM/SIGINT)
//!
//! # Configuration
//!
//! See [`trackflow_server::config`] for environment variable configuration.
//! A `.env` file in the working directory is loaded first if present.
//!
//! # Example
//!
//! ```bash
//! NOTEHUB_CLIENT_ID="..." \
//! NOTEHUB_CLIENT_SECRET="..." \
//! NOTEHUB_PROJECT_UID="app:..." \
//! PORT=8080 \
//! cargo run --release --bin trackflow-server
//! ```

use std::process::ExitCode;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use trackflow_server::config::Config;
use trackflow_server::routes::{create_router, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is the normal case in production
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    init_logging();
    debug!(dotenv_loaded, "Environment loaded");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Failed to load configuration");
            eprintln!("Error: {err}");
            eprintln!();
            eprintln!("Required environment variables:");
            eprintln!("  NOTEHUB_CLIENT_ID             - OAuth2 client id");
            eprintln!("  NOTEHUB_CLIENT_SECRET         - OAuth2 client secret");
            eprintln!("  NOTEHUB_PROJECT_UID           - Project to read events from (app:...)");
            eprintln!();
            eprintln!("Optional environment variables:");
            eprintln!("  NOTEHUB_API_URL               - Events API base (default: https://api.notefile.net)");
            eprintln!("  NOTEHUB_AUTH_URL              - OAuth2 base (default: https://notehub.io)");
            eprintln!("  NOTEHUB_REQUEST_TIMEOUT_SECS  - Outbound timeout (default: 10)");
            eprintln!("  PORT                          - HTTP server port (default: 8080)");
            eprintln!("  RUST_LOG                      - Log level filter (default: info)");
            return ExitCode::from(1);
        }
    };

    info!(
        port = config.port,
        project_uid = %config.project_uid,
        api_url = %config.api_url,
        timeout_secs = config.request_timeout.as_secs(),
        "TrackFlow server starting"
    );

    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(err) => {
            error!(error = %err, "Failed to create Notehub client");
            return ExitCode::from(1);
        }
    };

    let app = create_router(state);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => {
            info!(port = config.port, address = %bind_addr, "Server listening");
            listener
        }
        Err(err) => {
            error!(error = %err, address = %bind_addr, "Failed to bind to address");
            return ExitCode::from(1);
        }
    };

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    info!("Server ready to accept connections");

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
        return ExitCode::from(1);
    }

    info!("Server shutdown complete");
    ExitCode::SUCCESS
}

/// Initialize structured logging with tracing.
///
/// JSON output, filtered by `RUST_LOG` with a default of `info`.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,axum::rejection=trace"));

    let json_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .init();
}

/// Resolves when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
