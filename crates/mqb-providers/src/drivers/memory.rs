//! In-Memory Message Driver
//!
//! Single-process broker with per-topic retained history, used for tests and
//! local fan-out.
//!
//! ## Features
//!
//! - Replay of retained history (`FromBeginning`, `FromLast`, `FromLastN`, `FromIndex`)
//! - Per-topic locking, no global lock
//! - Optional retention cap evicting the oldest messages
//! - History and registrations are dropped on disconnect
//!
//! ## Ordering
//!
//! Appending to history and enqueueing to handlers happen under the topic's
//! entry lock. A new subscription registers its worker and enqueues its replay
//! slice under that same lock, so a concurrent publish lands either in the
//! replay slice or in live delivery, never both and never neither, and always
//! after the replayed messages.
//!
//! ## Example
//!
//! ```ignore
//! use mqb_providers::drivers::InMemoryMessageDriver;
//!
//! let driver = InMemoryMessageDriver::new();
//! driver.publish(&topic, Bytes::from_static(b"hello")).await?;
//! let id = driver.subscribe(&topic, handler, ReplayPosition::FromBeginning).await?;
//! ```

use super::dispatch::SubscriptionWorker;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use mqb_domain::constants::DEFAULT_HISTORY_LIMIT;
use mqb_domain::error::Result;
use mqb_domain::ports::{MessageDriver, RawHandler};
use mqb_domain::value_objects::{ReplayPosition, SubscriptionId, Topic};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

#[derive(Default)]
struct TopicState {
    history: VecDeque<Bytes>,
    workers: Vec<SubscriptionWorker>,
}

/// In-process driver with replayable history
pub struct InMemoryMessageDriver {
    topics: DashMap<String, TopicState>,
    history_limit: Option<usize>,
    connected: AtomicBool,
}

impl InMemoryMessageDriver {
    /// Create a driver retaining up to `DEFAULT_HISTORY_LIMIT` messages per topic
    pub fn new() -> Self {
        Self::with_history_limit(Some(DEFAULT_HISTORY_LIMIT))
    }

    /// Create with a custom retention cap
    ///
    /// # Arguments
    ///
    /// * `history_limit` - Messages kept per topic; `None` keeps everything
    pub fn with_history_limit(history_limit: Option<usize>) -> Self {
        Self {
            topics: DashMap::new(),
            history_limit,
            connected: AtomicBool::new(false),
        }
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Configured retention cap
    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }

    /// Number of retained messages on a topic
    pub fn history_len(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |state| state.history.len())
    }

    /// Number of live registrations on a topic
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |state| state.workers.len())
    }
}

impl Default for InMemoryMessageDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryMessageDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMessageDriver")
            .field("topics", &self.topics.len())
            .field("history_limit", &self.history_limit)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl MessageDriver for InMemoryMessageDriver {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn supports_replay(&self) -> bool {
        true
    }

    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::Release);
        debug!("In-memory driver connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        // Dropping the workers closes their queues
        self.topics.clear();
        self.connected.store(false, Ordering::Release);
        debug!("In-memory driver disconnected, history and subscriptions cleared");
        Ok(())
    }

    async fn publish(&self, topic: &Topic, payload: Bytes) -> Result<()> {
        let mut state = self.topics.entry(topic.to_string()).or_default();

        state.history.push_back(payload.clone());
        if let Some(limit) = self.history_limit {
            while state.history.len() > limit {
                state.history.pop_front();
            }
        }

        state.workers.retain(|worker| worker.deliver(payload.clone()));
        trace!(
            topic = %topic,
            subscribers = state.workers.len(),
            retained = state.history.len(),
            "Published message"
        );
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &Topic,
        handler: RawHandler,
        replay: ReplayPosition,
    ) -> Result<SubscriptionId> {
        let id = SubscriptionId::new();
        let worker = SubscriptionWorker::spawn(topic, id, handler);

        let replayed = {
            let mut state = self.topics.entry(topic.to_string()).or_default();
            let range = replay.replay_range(state.history.len());
            let count = range.len();
            for payload in state.history.range(range) {
                worker.deliver(payload.clone());
            }
            state.workers.push(worker.clone());
            count
        };

        // Replay is complete before subscribe returns
        let _ = worker.flush().await;
        debug!(topic = %topic, subscription = %id, %replay, replayed, "Subscribed");
        Ok(id)
    }

    async fn unsubscribe(&self, topic: &Topic, id: SubscriptionId) -> Result<()> {
        if let Some(mut state) = self.topics.get_mut(topic.as_str()) {
            state.workers.retain(|worker| worker.id() != id);
        }
        debug!(topic = %topic, subscription = %id, "Unsubscribed");
        Ok(())
    }
}
