//! HTTP header name constants.
//!
//! This module defines which caller headers the relay refuses to forward and the
//! headers it adds to relayed responses.

/// Header carrying the effective URL of a relayed page (after redirects).
pub const HEADER_RELAY_FINAL_URL: &str = "x-relay-final-url";

/// Headers that are never forwarded from the caller to the remote server.
///
/// Hop-by-hop headers only describe the connection between the webview and the
/// local relay. `host` is rewritten per hop, `content-length` is meaningless for a
/// bodiless GET, and `accept-encoding` is left to the HTTP client so it can decode
/// what it negotiated.
pub const NON_FORWARDED_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
    "accept-encoding",
];

/// Caller credentials, forwarded only while the hop stays on the request URL's origin.
pub const CREDENTIAL_HEADERS: &[&str] = &["authorization", "cookie", "proxy-authorization"];
