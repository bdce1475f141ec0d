//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `webview_relay` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - One-shot fetches (`webview-relay <url>`) or serving the relay endpoint
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::header::HeaderMap;
use std::process;

use webview_relay::initialization::init_logger_with;
use webview_relay::{run_server, Config, Relay, RelayMessage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load RELAY_* settings from a .env file when present
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Some(url) = config.url.clone() {
        let relay = Relay::from_config(&config).context("Failed to initialize HTTP client")?;
        let result = relay.relay(&url, &HeaderMap::new()).await;
        let failed = result.is_err();
        let message = RelayMessage::from(result);
        println!(
            "{}",
            serde_json::to_string_pretty(&message).context("Failed to serialize result")?
        );
        if failed {
            process::exit(1);
        }
        return Ok(());
    }

    if let Err(e) = run_server(config).await {
        eprintln!("webview-relay error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
