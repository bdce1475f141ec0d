//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Cancels a background server task and waits for it to finish.
///
/// The task is expected to observe `cancel` and drain in-flight requests before
/// returning. A task that panicked is logged, not propagated.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    server_task: Option<tokio::task::JoinHandle<()>>,
) {
    cancel.cancel();
    if let Some(server_task) = server_task {
        if let Err(join_error) = server_task.await {
            log::warn!("Relay server task ended abnormally: {:?}", join_error);
        }
    }
}

/// Resolves when the process receives Ctrl-C (or SIGTERM on Unix), then cancels
/// `cancel` so every listener tied to it starts draining.
pub async fn cancel_on_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }
    log::info!("Shutdown requested, draining relay connections");
    cancel.cancel();
}
