//! HTTP redirect chain tracking.
//!
//! Redirects are followed manually so the chain can be bounded and every hop can be
//! issued with its own `Host` header.

use reqwest::{StatusCode, Url};

/// Ordered URLs visited during one fetch, starting with the request URL.
///
/// Lives only for the duration of a single `Fetcher::fetch` call.
#[derive(Debug, Clone)]
pub struct RedirectChain {
    urls: Vec<Url>,
}

impl RedirectChain {
    /// Starts a chain at the request URL.
    pub fn new(start: Url) -> Self {
        Self { urls: vec![start] }
    }

    /// The URL the next request goes to.
    pub fn current(&self) -> &Url {
        // `urls` is never empty: `new` seeds it and nothing removes entries
        &self.urls[self.urls.len() - 1]
    }

    /// Records a followed redirect.
    pub fn push(&mut self, next: Url) {
        self.urls.push(next);
    }

    /// Number of redirects followed so far.
    pub fn redirects(&self) -> usize {
        self.urls.len() - 1
    }

    /// The visited URLs as strings, in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.urls.iter().map(Url::to_string).collect()
    }
}

/// Returns true for statuses in `[300, 400)`.
pub fn is_redirect(status: StatusCode) -> bool {
    status.is_redirection()
}

/// Resolves a `Location` header value against the URL that produced it.
///
/// Absolute targets are returned unchanged; relative ones (`/next`, `next`,
/// `../x`, `//host/x`, `?q`) are joined onto `current`.
pub fn resolve_location(current: &Url, location: &str) -> Result<Url, url::ParseError> {
    current.join(location.trim())
}
