use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use portfolio_api_rust::{app, config, is_production, AppState};

#[derive(Parser)]
#[command(name = "portfolio-api")]
#[command(about = "Portfolio API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides PORTFOLIO_API_PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Interface to bind (overrides PORTFOLIO_API_HOST)")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up AIRFLOW_SECRET, USER_SERVICE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let args = Args::parse();
    let config = config::config();
    tracing::info!("Starting Portfolio API in {:?} mode", config.environment);

    if config.trust.shared_secret.is_none() {
        if is_production!() {
            tracing::error!("AIRFLOW_SECRET is not set; external calls to internal routes will be refused");
        } else {
            tracing::warn!("AIRFLOW_SECRET is not set; only local and trusted-service calls reach internal routes");
        }
    }

    let state = AppState::from_config(config).context("failed to wire authentication pipeline")?;
    let _sweeper = state.cache.spawn_sweeper(config.cache.sweep_interval());

    let router = app(state, &config.security);

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Portfolio API listening on http://{}", bind_addr);

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server error")?;

    Ok(())
}
