//! Error categorization.
//!
//! This module maps transport errors onto `NetworkErrorType` and builds the
//! `RelayError` reported to the caller.

use super::types::{NetworkErrorType, RelayError};

/// Categorizes a `reqwest::Error` into a `NetworkErrorType`.
///
/// Timeouts are checked before connect errors because a connect timeout reports
/// both. Redirect errors cannot occur: the client follows no redirects itself.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> NetworkErrorType {
    if error.is_builder() {
        NetworkErrorType::HttpRequestBuilderError
    } else if error.is_timeout() {
        NetworkErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        NetworkErrorType::HttpRequestConnectError
    } else if error.is_body() {
        NetworkErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        NetworkErrorType::HttpRequestDecodeError
    } else if error.is_request() {
        NetworkErrorType::HttpRequestRequestError
    } else {
        NetworkErrorType::HttpRequestOtherError
    }
}

/// Builds a `RelayError::Network` for a transport failure at any hop.
///
/// The message is prefixed with the error category and includes the full source
/// chain, since `reqwest::Error`'s own `Display` hides the root cause (DNS, TLS).
pub fn network_error(original_url: &str, error: &reqwest::Error) -> RelayError {
    let category = categorize_reqwest_error(error);
    let mut message = format!("{category}: {error}");
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    RelayError::Network {
        url: original_url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_categorize_connect_error() {
        // Port 1 on localhost is reserved and refuses connections
        let client = reqwest::Client::new();
        let err = client
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .expect_err("connection to port 1 should fail");
        assert_eq!(
            categorize_reqwest_error(&err),
            NetworkErrorType::HttpRequestConnectError
        );
    }

    #[tokio::test]
    async fn test_network_error_keeps_original_url() {
        let client = reqwest::Client::new();
        let err = client
            .get("http://127.0.0.1:1/next")
            .send()
            .await
            .expect_err("connection to port 1 should fail");
        let relay_err = network_error("https://original.example/", &err);
        assert_eq!(relay_err.original_url(), "https://original.example/");
        match relay_err {
            RelayError::Network { message, .. } => {
                assert!(message.starts_with("HTTP request connect error"));
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn test_categorize_builder_error() {
        let client = reqwest::Client::new();
        let err = client
            .get("not a url")
            .build()
            .expect_err("relative URL should not build");
        assert_eq!(
            categorize_reqwest_error(&err),
            NetworkErrorType::HttpRequestBuilderError
        );
    }
}
