mod cli;
mod client;
mod config;
mod error;
mod gateway;
mod openapi;
mod routes;
mod upstream;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Json};
use clap::Parser;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::error::ErrorResponse;
use crate::gateway::ProxyService;

/// Shared HTTP client configuration
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Headroom on top of the upstream timeout before the router gives up
const ROUTER_TIMEOUT_GRACE_SECS: u64 = 5;

#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyService>,
    pub config: Arc<AppConfig>,
}

/// Create shared HTTP client with connection pooling
pub fn create_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            status,
            Json(ErrorResponse::new(status, "Request timed out", err.to_string())),
        )
    } else {
        (
            status,
            Json(ErrorResponse::new(status, "Internal error", err.to_string())),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let http_client = create_http_client(config.upstream_timeout())?;
    tracing::debug!("Shared HTTP client created");

    let proxy = Arc::new(ProxyService::new(
        http_client,
        &config.upstream_base_url,
        config.upstream_timeout(),
    ));

    let router_timeout =
        config.upstream_timeout() + Duration::from_secs(ROUTER_TIMEOUT_GRACE_SECS);
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        proxy,
        config: Arc::new(config),
    };

    let app = routes::build_router(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(router_timeout),
        )
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so client output stays clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tianqi=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load()?;
    tracing::info!(default_city = %config.default_city, "Configuration loaded");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Client { city, once, json } => {
            client::terminal::run(&config, city, once, json).await
        }
    }
}
