//! Configuration constants.
//!
//! This module defines the defaults used throughout the relay, including
//! timeouts, redirect bounds and size limits.

/// Default address for the local relay listener.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

/// Maximum number of redirects followed for one fetch.
/// The sixth redirect response is never followed.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// Network operation timeouts
/// Per-hop request timeout in seconds (covers connect, headers and body)
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
/// TCP connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for outbound requests.
///
/// Only used when the caller did not send its own `User-Agent`; forwarded
/// headers take precedence. Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Maximum URL length (2048 characters) accepted by the resolver.
/// This matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Content type reported when the remote server sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Route prefix under which the target URL is embedded raw in the request target.
pub const RELAY_ROUTE_PREFIX: &str = "/relay/";
