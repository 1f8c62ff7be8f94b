//! Handler Dispatch
//!
//! Every registration gets its own delivery worker: a spawned task draining
//! an unbounded queue. Payloads reach a handler strictly in the order they
//! were enqueued, handlers of different registrations run concurrently, and
//! a failing or panicking handler is logged without touching anyone else.
//!
//! Publishers only enqueue, so a handler that publishes (even to its own
//! topic) cannot deadlock the driver.

use bytes::Bytes;
use dashmap::DashMap;
use futures::FutureExt;
use mqb_domain::ports::RawHandler;
use mqb_domain::value_objects::{SubscriptionId, Topic};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, trace, warn};

enum Delivery {
    Message(Bytes),
    Flush(oneshot::Sender<()>),
}

/// Sending side of one registration's delivery queue
///
/// Dropping the last clone lets the worker drain what is queued and exit.
#[derive(Clone)]
pub struct SubscriptionWorker {
    id: SubscriptionId,
    sender: mpsc::UnboundedSender<Delivery>,
}

impl SubscriptionWorker {
    /// Spawn the worker task for `handler` on the current tokio runtime
    pub fn spawn(topic: &Topic, id: SubscriptionId, handler: RawHandler) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let topic = topic.clone();

        tokio::spawn(async move {
            while let Some(delivery) = receiver.recv().await {
                match delivery {
                    Delivery::Message(payload) => {
                        invoke_handler(&topic, id, &handler, payload).await;
                    }
                    Delivery::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            trace!(topic = %topic, subscription = %id, "Delivery worker stopped");
        });

        Self { id, sender }
    }

    /// Registration this worker serves
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Enqueue a payload; `false` once the worker is gone
    pub fn deliver(&self, payload: Bytes) -> bool {
        self.sender.send(Delivery::Message(payload)).is_ok()
    }

    /// Barrier resolving after everything enqueued so far has been handled
    pub fn flush(&self) -> oneshot::Receiver<()> {
        let (done, flushed) = oneshot::channel();
        let _ = self.sender.send(Delivery::Flush(done));
        flushed
    }
}

/// Run one handler invocation, logging instead of propagating faults
async fn invoke_handler(
    topic: &Topic,
    id: SubscriptionId,
    handler: &RawHandler,
    payload: Bytes,
) {
    let outcome = AssertUnwindSafe(async { handler(payload).await })
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(topic = %topic, subscription = %id, error = %e, "Message handler failed");
        }
        Err(panic) => {
            error!(
                topic = %topic,
                subscription = %id,
                panic = panic_message(panic.as_ref()),
                "Message handler panicked"
            );
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Local fan-out table: topic name -> delivery workers
///
/// Used by broker drivers whose transport delivers one copy per topic that
/// must then reach every local registration.
#[derive(Default)]
pub struct TopicRegistry {
    workers: DashMap<String, Vec<SubscriptionWorker>>,
}

impl TopicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worker; returns `true` if it is the first one for the topic
    pub fn register(&self, topic: &Topic, worker: SubscriptionWorker) -> bool {
        let mut workers = self.workers.entry(topic.to_string()).or_default();
        workers.push(worker);
        workers.len() == 1
    }

    /// Remove a worker; returns `Some(true)` if the topic has no workers left,
    /// `None` if the id was not registered
    pub fn deregister(&self, topic: &Topic, id: SubscriptionId) -> Option<bool> {
        let now_empty = {
            let mut workers = self.workers.get_mut(topic.as_str())?;
            let before = workers.len();
            workers.retain(|worker| worker.id() != id);
            if workers.len() == before {
                return None;
            }
            workers.is_empty()
        };
        if now_empty {
            self.workers
                .remove_if(topic.as_str(), |_, workers| workers.is_empty());
        }
        Some(now_empty)
    }

    /// Enqueue `payload` for every worker on `topic`; returns how many accepted it
    pub fn dispatch(&self, topic: &str, payload: &Bytes) -> usize {
        let Some(mut workers) = self.workers.get_mut(topic) else {
            return 0;
        };
        workers.retain(|worker| worker.deliver(payload.clone()));
        workers.len()
    }

    /// Topic names with at least one registration
    pub fn topics(&self) -> Vec<String> {
        self.workers.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of registrations on a topic
    pub fn handler_count(&self, topic: &str) -> usize {
        self.workers.get(topic).map_or(0, |workers| workers.len())
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.workers.clear();
    }
}
