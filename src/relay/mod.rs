//! The relay pipeline: resolve, fetch (following redirects), rewrite.
//!
//! Every call runs `Resolving -> Fetching -> (Redirecting -> Fetching)* -> Rewriting`
//! and ends in exactly one `FetchResult`. Calls share nothing but the HTTP client's
//! connection pool.

mod navigator;

use log::{debug, info, warn};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::app::resolve_url;
use crate::config::Config;
use crate::error_handling::{InitializationError, RelayError};
use crate::fetch::Fetcher;
use crate::rewrite::rewrite;

pub use navigator::Navigator;

/// A successfully relayed page, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayedPage {
    /// Effective URL after redirects
    pub final_url: String,
    /// HTTP status of the terminal response
    pub status: u16,
    /// Content type reported by the remote server
    pub content_type: String,
    /// Body with relative `src`/`href` values made absolute
    pub body: String,
    /// URLs requested, from the resolved request URL to `final_url`
    pub redirect_chain: Vec<String>,
}

/// Outcome of one relay call: the page, or the failure with the original URL.
pub type FetchResult = Result<RelayedPage, RelayError>;

/// Runs the resolve → fetch → rewrite pipeline.
#[derive(Debug, Clone)]
pub struct Relay {
    fetcher: Fetcher,
}

impl Relay {
    /// Creates a relay around an existing fetcher.
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Creates a relay with a fetcher built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        Ok(Self::new(Fetcher::from_config(config)?))
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Relays one navigation.
    ///
    /// `raw_url` is the address as typed (a missing scheme becomes `https://`);
    /// `headers` are the triggering request's headers, forwarded to the remote
    /// server with `Host` rewritten.
    ///
    /// Never returns a partially rewritten body: any failure yields `Err` with
    /// the original URL.
    pub async fn relay(&self, raw_url: &str, headers: &HeaderMap) -> FetchResult {
        match self.run(raw_url, headers).await {
            Ok(page) => {
                info!(
                    "Relayed {} -> {} ({}, {} bytes, {} redirect(s))",
                    raw_url,
                    page.final_url,
                    page.status,
                    page.body.len(),
                    page.redirect_chain.len().saturating_sub(1)
                );
                Ok(page)
            }
            Err(e) => {
                warn!("Relay failed [{}]: {}", e.kind(), e);
                Err(e)
            }
        }
    }

    async fn run(&self, raw_url: &str, headers: &HeaderMap) -> FetchResult {
        debug!("Resolving {:?}", raw_url);
        let url = resolve_url(raw_url)?;

        debug!("Fetching {}", url);
        let page = self.fetcher.fetch(&url, headers).await?;

        debug!("Rewriting links against {}", page.final_url);
        let body = rewrite(&page.body, &page.final_url);

        Ok(RelayedPage {
            final_url: page.final_url.to_string(),
            status: page.status,
            content_type: page.content_type,
            body,
            redirect_chain: page.redirect_chain,
        })
    }
}
