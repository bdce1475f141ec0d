//! HTTP client initialization.
//!
//! This module builds the outbound client used by the fetcher.

use std::sync::Arc;

use crate::config::Config;
use reqwest::ClientBuilder;

/// Initializes the shared HTTP client for relayed fetches.
///
/// Creates a `reqwest::Client` configured with:
/// - Redirects disabled, so the fetcher can follow and bound them itself
/// - Per-request timeout from the config (applied to every hop separately)
/// - Connect timeout from the config
/// - Default User-Agent (forwarded caller headers override it)
/// - No cookie store; nothing persists across navigations
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
