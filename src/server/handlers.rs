//! Relay endpoint handlers.

use std::borrow::Cow;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use super::types::{FetchParams, RelayMessage, RelayState};
use crate::config::{HEADER_RELAY_FINAL_URL, RELAY_ROUTE_PREFIX};
use crate::error_handling::{ErrorKind, RelayError};

/// `GET /fetch?url=...`: relays the page and answers with a JSON `RelayMessage`.
pub async fn fetch_handler(
    State(state): State<RelayState>,
    Query(params): Query<FetchParams>,
    headers: HeaderMap,
) -> Response {
    let result = state.relay.relay(&params.url, &headers).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => failure_status(e),
    };
    (status, Json(RelayMessage::from(result))).into_response()
}

/// `GET /relay/<url>`: relays the page and answers with the rewritten body itself.
///
/// The target URL is taken raw from the request target, query string included, so
/// `/relay/https://a.com/search?q=x` fetches `https://a.com/search?q=x`.
pub async fn relay_handler(
    State(state): State<RelayState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let target = relay_target(&uri);
    match state.relay.relay(&target, &headers).await {
        Ok(page) => {
            let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::OK);
            let mut response = (status, page.body).into_response();
            let response_headers = response.headers_mut();
            if let Ok(value) = HeaderValue::from_str(&utf8_content_type(&page.content_type)) {
                response_headers.insert(header::CONTENT_TYPE, value);
            }
            if let Ok(value) = HeaderValue::from_str(&page.final_url) {
                response_headers.insert(HEADER_RELAY_FINAL_URL, value);
            }
            response
        }
        Err(e) => {
            let status = failure_status(&e);
            (status, Json(RelayMessage::from(Err(e)))).into_response()
        }
    }
}

/// `GET /health`
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Extracts the embedded target from `/relay/<target>`.
///
/// A target written with a literal `http://` or `https://` is used as is, query
/// included. Anything else (`http%3A%2F%2F...`, `example.com%2Fdocs`) is
/// percent-decoded first; a target that does not decode to UTF-8 is kept raw.
pub(crate) fn relay_target(uri: &Uri) -> Cow<'_, str> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("");
    let target = path_and_query
        .strip_prefix(RELAY_ROUTE_PREFIX)
        .unwrap_or(path_and_query);
    let lower = target.get(..8).unwrap_or(target).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Cow::Borrowed(target);
    }
    urlencoding::decode(target).unwrap_or(Cow::Borrowed(target))
}

/// The body was decoded to a Rust `String`, so whatever charset the remote server
/// declared, the relayed bytes are UTF-8.
pub(crate) fn utf8_content_type(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    if essence.is_empty() {
        "text/html; charset=utf-8".to_string()
    } else {
        format!("{essence}; charset=utf-8")
    }
}

fn failure_status(error: &RelayError) -> StatusCode {
    match error.kind() {
        ErrorKind::InvalidUrl => StatusCode::BAD_REQUEST,
        ErrorKind::TooManyRedirects | ErrorKind::Network => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_target_keeps_query() {
        let uri: Uri = "/relay/https://a.com/search?q=x".parse().unwrap();
        assert_eq!(relay_target(&uri), "https://a.com/search?q=x");
    }

    #[test]
    fn test_relay_target_decodes_encoded_url() {
        let uri: Uri = "/relay/https%3A%2F%2Fa.com%2Fsearch%3Fq%3Dx%2520y"
            .parse()
            .unwrap();
        assert_eq!(relay_target(&uri), "https://a.com/search?q=x%20y");
    }

    #[test]
    fn test_relay_target_literal_scheme_is_not_decoded() {
        let uri: Uri = "/relay/https://a.com/search?q=x%20y".parse().unwrap();
        assert_eq!(relay_target(&uri), "https://a.com/search?q=x%20y");
        let uri: Uri = "/relay/HTTP://a.com/%41".parse().unwrap();
        assert_eq!(relay_target(&uri), "HTTP://a.com/%41");
    }

    #[test]
    fn test_relay_target_decodes_schemeless() {
        let uri: Uri = "/relay/example.com%2Fdocs".parse().unwrap();
        assert_eq!(relay_target(&uri), "example.com/docs");
    }

    #[test]
    fn test_relay_target_schemeless() {
        let uri: Uri = "/relay/example.com".parse().unwrap();
        assert_eq!(relay_target(&uri), "example.com");
    }

    #[test]
    fn test_utf8_content_type() {
        assert_eq!(
            utf8_content_type("text/html; charset=ISO-8859-1"),
            "text/html; charset=utf-8"
        );
        assert_eq!(utf8_content_type("text/plain"), "text/plain; charset=utf-8");
        assert_eq!(utf8_content_type(""), "text/html; charset=utf-8");
    }

    #[test]
    fn test_failure_status() {
        let invalid = RelayError::InvalidUrl {
            url: "".to_string(),
            reason: "empty".to_string(),
        };
        assert_eq!(failure_status(&invalid), StatusCode::BAD_REQUEST);
        let network = RelayError::Network {
            url: "https://a.com".to_string(),
            message: "refused".to_string(),
        };
        assert_eq!(failure_status(&network), StatusCode::BAD_GATEWAY);
    }
}
