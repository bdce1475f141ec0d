//! Redirect-following tests for the fetcher.
//!
//! These tests verify:
//! - Chains of up to `max_redirects` redirects end at the terminal response
//! - One redirect more fails with `TooManyRedirects`, carrying the request URL
//! - `Location` resolution for relative and absolute targets
//! - Header forwarding with `Host` rewritten per hop

mod helpers;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use webview_relay::{
    categorize_reqwest_error, Config, ErrorKind, Fetcher, NetworkErrorType, RelayError,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{html, mount_redirect_chain, UNREACHABLE_URL};

fn fetcher(max_redirects: usize) -> Fetcher {
    Fetcher::from_config(&Config {
        max_redirects,
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        ..Default::default()
    })
    .expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_chains_up_to_the_limit_are_followed() {
    for hops in 0..=5 {
        let server = MockServer::start().await;
        let start = mount_redirect_chain(&server, hops, "<p>done</p>").await;

        let page = fetcher(5)
            .fetch(&start, &HeaderMap::new())
            .await
            .unwrap_or_else(|e| panic!("{hops} redirect(s) should be followed: {e}"));

        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<p>done</p>");
        assert_eq!(page.final_url.as_str(), format!("{}/hop/{hops}", server.uri()));
        assert_eq!(page.redirect_chain.len(), hops + 1);
        assert_eq!(page.redirect_chain[0], start);
    }
}

#[tokio::test]
async fn test_sixth_redirect_is_never_followed() {
    let server = MockServer::start().await;
    let start = mount_redirect_chain(&server, 6, "<p>unreachable</p>").await;

    let err = fetcher(5)
        .fetch(&start, &HeaderMap::new())
        .await
        .expect_err("6 redirects exceed the bound");

    assert_eq!(err.kind(), ErrorKind::TooManyRedirects);
    assert_eq!(err.original_url(), start);

    // The terminal page behind the sixth redirect must never be requested
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 6);
    assert!(requests.iter().all(|r| r.url.path() != "/hop/6"));
}

#[tokio::test]
async fn test_redirect_bound_is_configurable() {
    let server = MockServer::start().await;
    let start = mount_redirect_chain(&server, 2, "ok").await;

    let err = fetcher(1)
        .fetch(&start, &HeaderMap::new())
        .await
        .expect_err("2 redirects exceed a bound of 1");
    assert!(matches!(err, RelayError::TooManyRedirects { limit: 1, .. }));

    let page = fetcher(2)
        .fetch(&start, &HeaderMap::new())
        .await
        .expect("2 redirects fit a bound of 2");
    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_redirect_loop_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let start = format!("{}/loop", server.uri());
    let err = fetcher(5)
        .fetch(&start, &HeaderMap::new())
        .await
        .expect_err("a loop must terminate");
    assert_eq!(err.kind(), ErrorKind::TooManyRedirects);
    assert_eq!(err.original_url(), start);
}

#[tokio::test]
async fn test_absolute_location_to_another_host() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x/y"))
        .respond_with(
            ResponseTemplate::new(307).insert_header("Location", format!("{}/z", second.uri())),
        )
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/z"))
        .and(header("host", second.address().to_string().as_str()))
        .respond_with(html(200, "second"))
        .mount(&second)
        .await;

    let page = fetcher(5)
        .fetch(&format!("{}/x/y", first.uri()), &HeaderMap::new())
        .await
        .expect("cross-host redirect should be followed");
    assert_eq!(page.final_url.as_str(), format!("{}/z", second.uri()));
    assert_eq!(page.body, "second");
}

#[tokio::test]
async fn test_credentials_not_sent_to_another_origin() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .and(header("authorization", "Bearer secret"))
        .and(header("cookie", "session=abc"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/landing", second.uri())),
        )
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(html(200, "landed"))
        .mount(&second)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("authorization", HeaderValue::from_static("Bearer secret"));
    headers.insert("cookie", HeaderValue::from_static("session=abc"));
    headers.insert("accept-language", HeaderValue::from_static("fr-FR"));

    let page = fetcher(5)
        .fetch(&format!("{}/login", first.uri()), &headers)
        .await
        .expect("cross-origin redirect should be followed");
    assert_eq!(page.body, "landed");

    let requests = second.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0].headers.get("cookie").is_none());
    assert_eq!(requests[0].headers.get("accept-language").unwrap(), "fr-FR");
}

#[tokio::test]
async fn test_credentials_kept_on_same_origin_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .and(header("cookie", "session=abc"))
        .respond_with(html(200, "same origin"))
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("cookie", HeaderValue::from_static("session=abc"));

    let page = fetcher(5)
        .fetch(&format!("{}/old", server.uri()), &headers)
        .await
        .expect("same-origin redirect keeps the cookie");
    assert_eq!(page.body, "same origin");
}

#[tokio::test]
async fn test_document_relative_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/old"))
        .respond_with(ResponseTemplate::new(308).insert_header("Location", "new?v=2"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/new"))
        .respond_with(html(200, "new"))
        .mount(&server)
        .await;

    let page = fetcher(5)
        .fetch(&format!("{}/docs/old", server.uri()), &HeaderMap::new())
        .await
        .expect("relative redirect should be followed");
    assert_eq!(page.final_url.as_str(), format!("{}/docs/new?v=2", server.uri()));
}

#[tokio::test]
async fn test_redirect_without_location_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/choices"))
        .respond_with(html(300, "<a href=\"a\">a</a>"))
        .mount(&server)
        .await;

    let page = fetcher(5)
        .fetch(&format!("{}/choices", server.uri()), &HeaderMap::new())
        .await
        .expect("3xx without Location is returned as the page");
    assert_eq!(page.status, 300);
    assert_eq!(page.redirect_chain.len(), 1);
}

#[tokio::test]
async fn test_error_status_is_a_page_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(404, "<h1>Not Found</h1>"))
        .mount(&server)
        .await;

    let page = fetcher(5)
        .fetch(&format!("{}/missing", server.uri()), &HeaderMap::new())
        .await
        .expect("a 404 page is still a page");
    assert_eq!(page.status, 404);
    assert_eq!(page.body, "<h1>Not Found</h1>");
    assert!(page.content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_forwards_headers_and_rewrites_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("host", server.address().to_string().as_str()))
        .and(header("accept-language", "fr-FR"))
        .and(header("user-agent", "webview/2.0"))
        .respond_with(html(200, "forwarded"))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("host", HeaderValue::from_static("127.0.0.1:8787"));
    headers.insert("accept-language", HeaderValue::from_static("fr-FR"));
    headers.insert("user-agent", HeaderValue::from_static("webview/2.0"));
    headers.insert("connection", HeaderValue::from_static("upgrade"));

    let page = fetcher(5)
        .fetch(&format!("{}/", server.uri()), &headers)
        .await
        .expect("request with forwarded headers should match");
    assert_eq!(page.body, "forwarded");

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests[0].headers.get("connection").map_or(true, |v| v != "upgrade"));
}

#[tokio::test]
async fn test_connection_failure_is_network_error_with_original_url() {
    let err = fetcher(5)
        .fetch(UNREACHABLE_URL, &HeaderMap::new())
        .await
        .expect_err("nothing listens on port 1");
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.original_url(), UNREACHABLE_URL);
}

#[tokio::test]
async fn test_connection_failure_is_categorized_as_connect() {
    let err = reqwest::Client::new()
        .get(UNREACHABLE_URL)
        .send()
        .await
        .expect_err("nothing listens on port 1");
    assert_eq!(
        categorize_reqwest_error(&err),
        NetworkErrorType::HttpRequestConnectError
    );

    match fetcher(5).fetch(UNREACHABLE_URL, &HeaderMap::new()).await {
        Err(RelayError::Network { message, .. }) => {
            assert!(message.starts_with(NetworkErrorType::HttpRequestConnectError.as_str()));
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_mid_chain_reports_original_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", UNREACHABLE_URL))
        .mount(&server)
        .await;

    let start = format!("{}/start", server.uri());
    let err = fetcher(5)
        .fetch(&start, &HeaderMap::new())
        .await
        .expect_err("second hop is unreachable");
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.original_url(), start);
}

#[tokio::test]
async fn test_stalled_hop_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(200, "late").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let fetcher = Fetcher::from_config(&Config {
        timeout_seconds: 1,
        ..Default::default()
    })
    .expect("Failed to build fetcher");
    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()), &HeaderMap::new())
        .await
        .expect_err("a stalled hop must time out");
    match err {
        RelayError::Network { message, .. } => {
            assert!(message.contains("timeout"), "message: {message}");
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_relative_url_is_rejected_without_request() {
    let err = fetcher(5)
        .fetch("/just/a/path", &HeaderMap::new())
        .await
        .expect_err("fetch requires an absolute URL");
    assert_eq!(err.kind(), ErrorKind::InvalidUrl);
}
