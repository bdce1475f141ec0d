//! Redirect-following fetcher.
//!
//! Issues a GET for a resolved URL, follows up to `max_redirects` redirects
//! (resolving each `Location` against the URL that produced it) and returns the
//! terminal response's body together with its effective URL.

mod redirects;
mod request;


use std::sync::Arc;

use log::{debug, warn};
use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use reqwest::Url;

use crate::config::{Config, DEFAULT_CONTENT_TYPE};
use crate::error_handling::{network_error, InitializationError, RelayError};
use crate::initialization::init_client;

pub use redirects::{is_redirect, resolve_location, RedirectChain};

/// The terminal response of a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL that produced this response; differs from the request URL after redirects
    pub final_url: Url,
    /// HTTP status of the terminal response
    pub status: u16,
    /// `Content-Type` of the terminal response, `DEFAULT_CONTENT_TYPE` if absent
    pub content_type: String,
    /// Full decoded body
    pub body: String,
    /// Every URL requested, starting with the request URL and ending with `final_url`
    pub redirect_chain: Vec<String>,
}

/// Fetches pages, following a bounded number of redirects.
///
/// Cheap to clone; clones share the connection pool. Each `fetch` call keeps its
/// redirect chain on its own stack, so concurrent calls never interfere.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Arc<reqwest::Client>,
    max_redirects: usize,
}

impl Fetcher {
    /// Creates a fetcher around a client that must have redirects disabled.
    pub fn new(client: Arc<reqwest::Client>, max_redirects: usize) -> Self {
        Self {
            client,
            max_redirects,
        }
    }

    /// Creates a fetcher with a client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        Ok(Self::new(client, config.max_redirects))
    }

    /// The redirect bound.
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Fetches `url`, following redirects.
    ///
    /// `headers` are the caller's request headers; they are forwarded on every hop
    /// with `Host` replaced by that hop's authority. `Authorization` and `Cookie` are
    /// only sent while the hop shares the request URL's origin. Each hop is a single
    /// attempt bounded by the client's timeout.
    ///
    /// A 3xx response without a `Location` header is treated as terminal.
    ///
    /// # Errors
    ///
    /// - `RelayError::InvalidUrl` if `url` is not absolute (no request is sent)
    /// - `RelayError::TooManyRedirects` when a redirect arrives after `max_redirects`
    ///   have already been followed
    /// - `RelayError::Network` on any transport failure, on a non-UTF-8 `Location`, or
    ///   on a `Location` that cannot be resolved
    ///
    /// All errors carry `url`, never an intermediate hop.
    pub async fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<FetchedPage, RelayError> {
        let start = Url::parse(url).map_err(|e| RelayError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let forwarded = request::forwarded_headers(headers);
        let cross_origin = request::without_credentials(&forwarded);
        let start_origin = start.origin();
        let mut chain = RedirectChain::new(start);

        loop {
            let current = chain.current().clone();
            let forwarded = if current.origin() == start_origin {
                &forwarded
            } else {
                &cross_origin
            };
            debug!(
                "GET {} (redirects so far: {}, forwarded headers: {:?})",
                current,
                chain.redirects(),
                request::header_names(forwarded)
            );

            let response = request::build_request(&self.client, &current, forwarded)
                .send()
                .await
                .map_err(|e| network_error(url, &e))?;
            let status = response.status();
            debug!("{} responded with {}", current, status);

            if is_redirect(status) {
                if let Some(location) = response.headers().get(LOCATION) {
                    if chain.redirects() >= self.max_redirects {
                        return Err(RelayError::TooManyRedirects {
                            url: url.to_string(),
                            limit: self.max_redirects,
                        });
                    }
                    let location = location.to_str().map_err(|_| RelayError::Network {
                        url: url.to_string(),
                        message: format!("non UTF-8 Location header from {current}"),
                    })?;
                    let next =
                        resolve_location(&current, location).map_err(|e| RelayError::Network {
                            url: url.to_string(),
                            message: format!("invalid redirect target '{location}' from {current}: {e}"),
                        })?;
                    debug!("Redirect {} -> {}", current, next);
                    chain.push(next);
                    continue;
                }
                warn!(
                    "Redirect status {} for {} but no Location header, treating as final",
                    status, current
                );
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let body = response.text().await.map_err(|e| network_error(url, &e))?;
            debug!(
                "{} returned {} bytes ({}) after {} redirect(s)",
                current,
                body.len(),
                content_type,
                chain.redirects()
            );

            return Ok(FetchedPage {
                final_url: current,
                status: status.as_u16(),
                content_type,
                body,
                redirect_chain: chain.to_strings(),
            });
        }
    }
}
