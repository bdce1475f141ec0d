//! Per-consumer navigation with best-effort cancellation.

use std::sync::{Mutex, PoisonError};

use log::debug;
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;

use super::{FetchResult, Relay};

/// Issues navigations for one consumer (e.g. one tab).
///
/// Starting a navigation cancels the consumer's previous in-flight one, and a
/// superseded navigation resolves to `None`, so a slow earlier response can never
/// overwrite the result of a newer one. Separate navigators are independent.
#[derive(Debug)]
pub struct Navigator {
    relay: Relay,
    current: Mutex<CancellationToken>,
}

impl Navigator {
    /// Creates a navigator that relays through `relay`.
    pub fn new(relay: Relay) -> Self {
        Self {
            relay,
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// Navigates to `raw_url`, superseding any navigation still in flight.
    ///
    /// Returns `None` if this navigation was itself superseded (or cancelled via
    /// `cancel`) before its result could be delivered.
    pub async fn navigate(&self, raw_url: &str, headers: &HeaderMap) -> Option<FetchResult> {
        let token = self.begin();

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.relay.relay(raw_url, headers) => Some(result),
        };

        // A newer navigation may have started after the fetch finished
        if token.is_cancelled() {
            debug!("Navigation to {:?} superseded, dropping result", raw_url);
            return None;
        }
        result
    }

    /// Cancels the in-flight navigation, if any.
    pub fn cancel(&self) {
        self.lock().cancel();
    }

    fn begin(&self) -> CancellationToken {
        let mut current = self.lock();
        current.cancel();
        let token = CancellationToken::new();
        *current = token.clone();
        token
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
