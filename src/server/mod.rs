//! Local relay endpoint.
//!
//! Provides three endpoints:
//! - `/fetch?url=<url>` - JSON message with the relayed page or the failure
//! - `/relay/<url>` - the rewritten page itself, for loading into a webview frame
//! - `/health` - liveness check
//!
//! The listener is process-wide: `LocalRelay` binds it lazily on first use and
//! tears it down on shutdown.

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::{Mutex, PoisonError};

use anyhow::{bail, Context, Result};
use axum::routing::get;
use axum::Router;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use crate::app::shutdown_gracefully;
use crate::relay::Relay;
use handlers::{fetch_handler, health_handler, relay_handler};
pub use types::{FailureMessage, RelayMessage, RelayState, SuccessMessage};

/// Builds the relay router.
pub fn router(relay: Relay) -> Router {
    Router::new()
        .route("/fetch", get(fetch_handler))
        .route("/relay/{*target}", get(relay_handler))
        .route("/health", get(health_handler))
        .with_state(RelayState { relay })
}

struct RunningServer {
    addr: SocketAddr,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

/// Handle to the process-wide relay listener.
///
/// The socket is bound on the first call to `address()`; concurrent first calls
/// bind exactly once. After `shutdown()` the handle cannot be restarted.
pub struct LocalRelay {
    relay: Relay,
    bind_addr: SocketAddr,
    cancel: CancellationToken,
    running: OnceCell<RunningServer>,
}

impl LocalRelay {
    /// Creates a handle that will serve `relay` on `bind_addr` once started.
    ///
    /// Use port 0 to let the OS pick a free port.
    pub fn new(relay: Relay, bind_addr: SocketAddr) -> Self {
        Self {
            relay,
            bind_addr,
            cancel: CancellationToken::new(),
            running: OnceCell::new(),
        }
    }

    /// Returns the listening address, binding and spawning the server on first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound or the listener has been shut down.
    pub async fn address(&self) -> Result<SocketAddr> {
        if self.cancel.is_cancelled() {
            bail!("Relay listener has been shut down");
        }
        let running = self.running.get_or_try_init(|| self.start()).await?;
        Ok(running.addr)
    }

    /// Token cancelled when the listener shuts down; cancelling it stops the listener.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops accepting connections, drains in-flight requests and waits for the
    /// server task to finish. A no-op if the listener never started.
    pub async fn shutdown(&self) {
        let task = self.running.get().and_then(|running| {
            running
                .task
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
        });
        shutdown_gracefully(self.cancel.clone(), task).await;
    }

    async fn start(&self) -> Result<RunningServer> {
        let listener = tokio::net::TcpListener::bind(self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind relay listener to {}", self.bind_addr))?;
        let addr = listener
            .local_addr()
            .context("Failed to read relay listener address")?;

        let app = router(self.relay.clone());
        let cancel = self.cancel.clone();
        let task = tokio::spawn(async move {
            let shutdown = async move { cancel.cancelled().await };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                log::warn!("Relay server error: {}", e);
            }
        });

        log::info!("Relay listening on http://{}/", addr);
        log::info!("  - Fetch (JSON): http://{}/fetch?url=<url>", addr);
        log::info!("  - Relay (page): http://{}/relay/<url>", addr);

        Ok(RunningServer {
            addr,
            task: Mutex::new(Some(task)),
        })
    }
}
