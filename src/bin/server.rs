//! FilingAgent HTTP service entry point.

use std::net::SocketAddr;

use clap::Parser;
use filingagent::server::{build_router, AppState};
use filingagent::Config;
use tracing::info;

#[derive(Parser)]
#[command(name = "filingagent-server", about = "FilingAgent HTTP service")]
struct Args {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port
    #[arg(long, short, default_value = "8000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log.level.clone().into());
    if config.log.format == "json" {
        tracing_subscriber::fmt().with_env_filter(env_filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let args = Args::parse();

    // Missing credentials are fatal here, never per-request
    config.validate()?;

    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(
        "FilingAgent v{} listening on http://{}",
        filingagent::VERSION,
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
