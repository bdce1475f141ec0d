//! webview_relay library: fetch pages on behalf of a sandboxed webview
//!
//! A webview that cannot issue cross-origin requests asks this relay for a URL. The
//! relay resolves the address, fetches it (following a bounded number of
//! redirects), rewrites relative `src`/`href` references into absolute URLs anchored
//! at the page's final URL, and hands back either the page or a tagged failure.
//!
//! # Example
//!
//! ```no_run
//! use webview_relay::{Config, Relay};
//! use reqwest::header::HeaderMap;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let relay = Relay::from_config(&Config::default())?;
//! match relay.relay("example.com", &HeaderMap::new()).await {
//!     Ok(page) => println!("{} ({} bytes)", page.final_url, page.body.len()),
//!     Err(e) => eprintln!("{} failed: {}", e.original_url(), e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod relay;
mod rewrite;
mod server;

// Re-export public API
pub use app::resolve_url;
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    categorize_reqwest_error, ErrorKind, InitializationError, NetworkErrorType, RelayError,
};
pub use fetch::{FetchedPage, Fetcher, RedirectChain};
pub use relay::{FetchResult, Navigator, Relay, RelayedPage};
pub use rewrite::{rewrite, RewriteContext};
pub use run::run_server;
pub use server::{router, FailureMessage, LocalRelay, RelayMessage, SuccessMessage};

// Internal run module (serves the relay until shutdown)
mod run {
    use anyhow::{Context, Result};
    use log::info;

    use crate::app::cancel_on_signal;
    use crate::config::Config;
    use crate::relay::Relay;
    use crate::server::LocalRelay;

    /// Runs the relay endpoint until Ctrl-C / SIGTERM.
    ///
    /// Binds `config.listen`, serves `/fetch`, `/relay/<url>` and `/health`, and on
    /// shutdown drains in-flight requests before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the address cannot be
    /// bound.
    pub async fn run_server(config: Config) -> Result<()> {
        let relay = Relay::from_config(&config).context("Failed to initialize HTTP client")?;
        info!(
            "Following at most {} redirect(s), {}s timeout per hop",
            relay.fetcher().max_redirects(),
            config.timeout_seconds
        );

        let local = LocalRelay::new(relay, config.listen);
        local
            .address()
            .await
            .context("Failed to start relay endpoint")?;

        cancel_on_signal(local.cancellation_token()).await;
        local.shutdown().await;
        info!("Relay stopped");
        Ok(())
    }
}
