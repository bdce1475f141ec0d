//! Outbound request construction.
//!
//! The relay forwards the caller's headers to the remote server, minus the ones in
//! `NON_FORWARDED_HEADERS`, and sets `Host` to the authority of each hop. Once a
//! redirect leaves the request URL's origin, `CREDENTIAL_HEADERS` are dropped too.

use reqwest::header::{HeaderMap, HeaderValue, HOST};
use reqwest::Url;

use crate::config::{CREDENTIAL_HEADERS, NON_FORWARDED_HEADERS};

/// Copies the caller's headers, dropping hop-by-hop and relay-local ones.
pub(crate) fn forwarded_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut forwarded = incoming.clone();
    for name in NON_FORWARDED_HEADERS {
        forwarded.remove(*name);
    }
    forwarded
}

/// Copies already forwarded headers without the caller's credentials.
pub(crate) fn without_credentials(forwarded: &HeaderMap) -> HeaderMap {
    let mut stripped = forwarded.clone();
    for name in CREDENTIAL_HEADERS {
        stripped.remove(*name);
    }
    stripped
}

/// `host[:port]` of a URL, with the port only when it is not the scheme default.
pub(crate) fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Builds the GET for one hop.
pub(crate) fn build_request(
    client: &reqwest::Client,
    url: &Url,
    forwarded: &HeaderMap,
) -> reqwest::RequestBuilder {
    let mut headers = forwarded.clone();
    if let Some(value) = authority(url).and_then(|a| HeaderValue::from_str(&a).ok()) {
        headers.insert(HOST, value);
    }
    client.get(url.clone()).headers(headers)
}

/// Header names only, for debug logging without leaking cookies or credentials.
pub(crate) fn header_names(headers: &HeaderMap) -> Vec<&str> {
    headers.keys().map(|name| name.as_str()).collect()
}
