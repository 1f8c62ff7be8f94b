//! Queue Lifecycle
//!
//! Owns the connect/disconnect pair of a shared [`MessageQueue`] so that
//! every exit path, explicit stop, ctrl-c or drop, releases the transport.

use crate::error_ext::ErrorContext;
use mqb_application::MessageQueue;
use mqb_domain::error::Result;
use mqb_domain::ports::MessageSerializer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::{info, warn};

/// Lifecycle guard for a message queue
pub struct QueueLifecycle<S: MessageSerializer> {
    queue: Arc<MessageQueue<S>>,
    /// Shutdown requested
    shutdown_signal: AtomicBool,
    /// Transport already released
    released: AtomicBool,
    notify: Notify,
}

impl<S: MessageSerializer> QueueLifecycle<S> {
    /// Take over the lifecycle of `queue`
    pub fn new(queue: Arc<MessageQueue<S>>) -> Self {
        Self {
            queue,
            shutdown_signal: AtomicBool::new(false),
            released: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// The managed queue
    pub fn queue(&self) -> &Arc<MessageQueue<S>> {
        &self.queue
    }

    /// Connect the queue
    pub async fn start(&self) -> Result<()> {
        self.released.store(false, Ordering::SeqCst);
        self.queue.connect().await
    }

    /// Ask a pending [`run_until_signal`](Self::run_until_signal) to stop
    pub fn signal_shutdown(&self) {
        info!("Shutdown signal received");
        self.shutdown_signal.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Whether shutdown has been requested
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_signal.load(Ordering::SeqCst)
    }

    /// Wait until [`signal_shutdown`](Self::signal_shutdown) is called
    pub async fn wait_for_shutdown(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_shutting_down() {
            return;
        }
        notified.await;
    }

    /// Disconnect the queue; later calls are no-ops
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_signal.store(true, Ordering::SeqCst);
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.queue.disconnect().await
    }

    /// Block until ctrl-c or [`signal_shutdown`](Self::signal_shutdown), then disconnect
    pub async fn run_until_signal(&self) -> Result<()> {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.io_context("Failed to listen for ctrl-c")?;
                info!("Interrupted, shutting down message queue");
            }
            () = self.wait_for_shutdown() => {}
        }
        self.shutdown().await
    }
}

impl<S: MessageSerializer> Drop for QueueLifecycle<S> {
    fn drop(&mut self) {
        if self.released.load(Ordering::SeqCst) {
            return;
        }
        // Best effort: release broker resources on the current runtime
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let queue = Arc::clone(&self.queue);
                handle.spawn(async move {
                    if let Err(e) = queue.disconnect().await {
                        warn!(error = %e, "Failed to disconnect message queue on drop");
                    }
                });
            }
            Err(_) => warn!("Message queue dropped outside a runtime without disconnecting"),
        }
    }
}

/// Wait for ctrl-c, then disconnect `queue`
pub async fn shutdown_on_signal<S: MessageSerializer>(queue: Arc<MessageQueue<S>>) -> Result<()> {
    QueueLifecycle::new(queue).run_until_signal().await
}
