//! Error type definitions.
//!
//! This module defines the relay's failure kinds and the errors raised while
//! setting up the process.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// The three ways a relay call can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input could not be resolved to an absolute http(s) URL.
    InvalidUrl,
    /// The redirect chain exceeded the configured bound.
    TooManyRedirects,
    /// DNS, connect, TLS, timeout or transport failure at some hop.
    Network,
}

impl ErrorKind {
    /// Stable identifier used in JSON responses and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::TooManyRedirects => "too_many_redirects",
            ErrorKind::Network => "network_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed relay call.
///
/// Every variant carries the URL the caller asked for (after resolution when
/// resolution succeeded), never an intermediate redirect target, so the caller can
/// correlate the failure with the navigation that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The input could not be resolved to an absolute URL. No request was sent.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Raw input as supplied by the caller
        url: String,
        /// Why resolution failed
        reason: String,
    },

    /// More than `max_redirects` redirect responses were received.
    #[error("Too many redirects fetching {url} (limit {limit})")]
    TooManyRedirects {
        /// Resolved request URL
        url: String,
        /// The configured redirect bound
        limit: usize,
    },

    /// Transport-level failure at some hop.
    #[error("Network error fetching {url}: {message}")]
    Network {
        /// Resolved request URL
        url: String,
        /// Description of the underlying failure
        message: String,
    },
}

impl RelayError {
    /// Returns the failure kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            RelayError::TooManyRedirects { .. } => ErrorKind::TooManyRedirects,
            RelayError::Network { .. } => ErrorKind::Network,
        }
    }

    /// Returns the URL the failing request was issued for.
    pub fn original_url(&self) -> &str {
        match self {
            RelayError::InvalidUrl { url, .. }
            | RelayError::TooManyRedirects { url, .. }
            | RelayError::Network { url, .. } => url,
        }
    }
}

/// Categories of network failures, used to label `RelayError::Network` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum NetworkErrorType {
    /// The request could not be built
    HttpRequestBuilderError,
    /// Connect, headers or body exceeded the per-hop timeout
    HttpRequestTimeoutError,
    /// Connection failed (includes DNS and TLS handshake failures)
    HttpRequestConnectError,
    /// Failure while sending the request
    HttpRequestRequestError,
    /// Failure while reading the response body
    HttpRequestBodyError,
    /// The response body could not be decoded
    HttpRequestDecodeError,
    /// Anything else
    HttpRequestOtherError,
}

impl std::fmt::Display for NetworkErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NetworkErrorType {
    /// Returns a human-readable label for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkErrorType::HttpRequestBuilderError => "HTTP request builder error",
            NetworkErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            NetworkErrorType::HttpRequestConnectError => "HTTP request connect error",
            NetworkErrorType::HttpRequestRequestError => "HTTP request error",
            NetworkErrorType::HttpRequestBodyError => "HTTP request body error",
            NetworkErrorType::HttpRequestDecodeError => "HTTP request decode error",
            NetworkErrorType::HttpRequestOtherError => "HTTP request other error",
        }
    }
}
