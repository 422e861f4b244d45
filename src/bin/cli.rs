//! FilingAgent CLI - run a single filing query from the terminal.

use clap::Parser;
use filingagent::server::AppState;
use filingagent::Config;

#[derive(Parser)]
#[command(name = "filingagent", about = "Find official company filings")]
struct Args {
    /// Natural language query, e.g. "Find Microsoft's most recent 10-K annual report"
    query: String,

    /// Print the full response object instead of just the filing record
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();

    config.validate()?;

    let state = AppState::from_config(&config)?;
    let response = state.search_filing(&args.query).await?;

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if let Some(filing) = &response.data {
        println!("{}", serde_json::to_string_pretty(filing)?);
    } else {
        anyhow::bail!(
            "No filing found: {}",
            response.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    Ok(())
}
