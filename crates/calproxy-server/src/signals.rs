//! Shutdown signalling.
//!
//! SIGINT (Ctrl-C) and SIGTERM trigger a graceful shutdown: the listener
//! stops accepting and in-flight requests are allowed to finish.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

/// Broadcasts a one-shot shutdown request to any number of waiters.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once shutdown has been triggered.
    pub async fn wait(self) {
        let mut rx = self.rx;
        // An error means every sender is gone; treat it as shutdown.
        let _ = rx.wait_for(|stop| *stop).await;
    }

    /// Spawns a task that triggers this handle on SIGINT or SIGTERM.
    pub fn listen_for_signals(&self) {
        let handle = self.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            handle.trigger();
        });
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler, Ctrl-C only");
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl-C, shutting down"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
