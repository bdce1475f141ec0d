// Shared test helpers for mock servers and relay construction.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::time::Duration;

use webview_relay::{Config, Relay};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a relay with a short per-hop timeout and the given redirect bound.
#[allow(dead_code)] // Used by other test files
pub fn create_test_relay(max_redirects: usize) -> Relay {
    let config = Config {
        max_redirects,
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        user_agent: "webview_relay_test/1.0".to_string(),
        ..Default::default()
    };
    Relay::from_config(&config).expect("Failed to build test relay")
}

/// Mounts `/hop/0 -> /hop/1 -> ... -> /hop/{hops}` where every hop but the last
/// answers 302 with a root-relative Location and the last answers 200 with `body`.
///
/// Returns the URL of the first hop.
#[allow(dead_code)] // Used by other test files
pub async fn mount_redirect_chain(server: &MockServer, hops: usize, body: &str) -> String {
    for i in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/hop/{i}")))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("/hop/{}", i + 1)),
            )
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(format!("/hop/{hops}")))
        .respond_with(html(200, body))
        .mount(server)
        .await;
    format!("{}/hop/0", server.uri())
}

/// An HTML response template.
#[allow(dead_code)] // Used by other test files
pub fn html(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

/// An HTML response that arrives after `delay`.
#[allow(dead_code)] // Used by other test files
pub fn slow_html(body: &str, delay: Duration) -> ResponseTemplate {
    html(200, body).set_delay(delay)
}

/// A URL nothing listens on (port 1 is reserved and refuses connections).
#[allow(dead_code)] // Used by other test files
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/";
