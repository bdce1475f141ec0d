//! Relay endpoint data structures.

use serde::{Deserialize, Serialize};

use crate::relay::{FetchResult, Relay};

/// Shared state for the relay endpoint
#[derive(Clone)]
pub struct RelayState {
    pub relay: Relay,
}

/// Query string of `GET /fetch`
#[derive(Debug, Deserialize)]
pub struct FetchParams {
    pub url: String,
}

/// JSON body describing a relayed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMessage {
    /// Always `true`
    pub ok: bool,
    /// Effective URL after redirects
    pub final_url: String,
    /// HTTP status of the terminal response
    pub status: u16,
    /// Content type reported by the remote server
    pub content_type: String,
    /// Rewritten page body
    pub body: String,
    /// URLs requested, in order
    pub redirect_chain: Vec<String>,
}

/// JSON body describing a failed relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureMessage {
    /// Always `false`
    pub ok: bool,
    /// The URL the navigation asked for
    pub original_url: String,
    /// `invalid_url`, `too_many_redirects` or `network_error`
    pub kind: String,
    /// Human-readable description
    pub error: String,
}

/// The single message delivered to the UI collaborator per navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayMessage {
    /// The page was relayed
    Success(SuccessMessage),
    /// The relay failed; no body is delivered
    Failure(FailureMessage),
}

impl From<FetchResult> for RelayMessage {
    fn from(result: FetchResult) -> Self {
        match result {
            Ok(page) => RelayMessage::Success(SuccessMessage {
                ok: true,
                final_url: page.final_url,
                status: page.status,
                content_type: page.content_type,
                body: page.body,
                redirect_chain: page.redirect_chain,
            }),
            Err(e) => RelayMessage::Failure(FailureMessage {
                ok: false,
                original_url: e.original_url().to_string(),
                kind: e.kind().as_str().to_string(),
                error: e.to_string(),
            }),
        }
    }
}
