use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use drinks_api::config::AppConfig;
use drinks_api::AppState;

#[derive(Debug, Parser)]
#[command(name = "drinks-api", version, about = "Coffee shop drinks menu API")]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides BIND_ADDRESS)
    #[arg(long)]
    bind: Option<String>,

    /// Drop and recreate the drink table with seed data before serving
    #[arg(long)]
    reset_db: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH0_DOMAIN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("drinks_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if cli.reset_db {
        config.database.reset_on_start = true;
    }
    tracing::info!("Starting Drinks API in {:?} mode", config.environment);

    let bind_addr = config.listen_address();
    let state = AppState::from_config(config)
        .await
        .context("failed to open drink store")?;
    let app = drinks_api::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Drinks API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Drinks API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
