//! `flowstate` command line entry point.
//!
//! Loads configuration, connects the wallet if a key is configured, runs
//! one subcommand, and prints notifications as they are published.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flowstate_market::app_state::AppState;
use flowstate_market::cli::{self, Cli, NotificationPrinter};
use flowstate_market::config::MarketConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr so command output stays pipeable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json_logs = std::env::var("MARKET_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = MarketConfig::from_env()?;
    let theme = args.theme.unwrap_or(config.theme);
    tracing::debug!(api_url = %config.api_url, chain_id = config.chain_id, "configuration loaded");

    let state = AppState::from_config(config)?;
    let printer = NotificationPrinter::spawn(&state.bus, theme);

    let result = cli::execute(&state, args.command, theme).await;
    printer.finish().await;
    result
}
