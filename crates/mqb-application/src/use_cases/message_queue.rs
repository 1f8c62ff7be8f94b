//! Message Queue Use Case
//!
//! The typed publish/subscribe facade. Producers hand it values, it encodes
//! them with the configured serializer and passes bytes to the driver.
//! Subscribers register typed handlers; the facade wraps each one in a raw
//! handler that decodes before calling it.
//!
//! Every `subscribe` returns a [`SubscriptionHandle`]. The handle, not the
//! handler value, identifies the registration for `unsubscribe`, so the same
//! closure may be registered several times and each registration removed on
//! its own.

use bytes::Bytes;
use dashmap::DashMap;
use mqb_domain::error::Result;
use mqb_domain::ports::{MessageDriver, MessageSerializer, raw_handler};
use mqb_domain::value_objects::{ReplayPosition, SubscriptionId, Topic};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Token identifying one registration made through [`MessageQueue::subscribe`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    topic: Topic,
    id: SubscriptionId,
}

impl SubscriptionHandle {
    /// Topic the registration listens on
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Driver-level registration id
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.topic)
    }
}

/// Typed publish/subscribe facade over a [`MessageDriver`]
///
/// The queue is an explicitly constructed value with a single owner; share it
/// with `Arc` where several components publish or subscribe.
pub struct MessageQueue<S: MessageSerializer> {
    name: String,
    driver: Arc<dyn MessageDriver>,
    serializer: Arc<S>,
    registrations: DashMap<SubscriptionId, Topic>,
}

impl<S: MessageSerializer> MessageQueue<S> {
    /// Create a facade with injected driver and serializer
    pub fn new(name: impl Into<String>, driver: Arc<dyn MessageDriver>, serializer: S) -> Self {
        Self {
            name: name.into(),
            driver,
            serializer: Arc::new(serializer),
            registrations: DashMap::new(),
        }
    }

    /// Queue name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying driver
    pub fn driver(&self) -> &Arc<dyn MessageDriver> {
        &self.driver
    }

    /// Serializer used for every payload
    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Whether the driver reports an established connection
    pub fn is_connected(&self) -> bool {
        self.driver.is_connected()
    }

    /// Number of registrations made through this facade and not yet removed
    pub fn subscription_count(&self) -> usize {
        self.registrations.len()
    }

    /// Acquire the transport
    pub async fn connect(&self) -> Result<()> {
        self.driver.connect().await?;
        info!(queue = %self.name, driver = self.driver.name(), "Message queue connected");
        Ok(())
    }

    /// Release the transport and forget every registration
    ///
    /// Registrations are not restored by a later `connect`.
    pub async fn disconnect(&self) -> Result<()> {
        let result = self.driver.disconnect().await;
        self.registrations.clear();
        info!(queue = %self.name, driver = self.driver.name(), "Message queue disconnected");
        result
    }

    /// Encode `message` and publish it on `topic`
    ///
    /// Publishing to a topic nobody listens on is not an error.
    pub async fn publish<T>(&self, topic: &str, message: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let topic = Topic::new(topic)?;
        let payload = self.serializer.serialize(message)?;
        debug!(
            topic = %topic,
            bytes = payload.len(),
            content_type = self.serializer.content_type(),
            "Publishing message"
        );
        self.driver.publish(&topic, Bytes::from(payload)).await
    }

    /// Register a typed handler on `topic`
    ///
    /// Retained history selected by `replay` is delivered before this
    /// returns on drivers that keep history. Payloads that fail to decode as
    /// `T` are logged by the driver and skipped.
    pub async fn subscribe<T, F, Fut>(
        &self,
        topic: &str,
        replay: ReplayPosition,
        handler: F,
    ) -> Result<SubscriptionHandle>
    where
        T: DeserializeOwned + Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let topic = Topic::new(topic)?;
        let serializer = Arc::clone(&self.serializer);

        let raw = raw_handler(move |payload: Bytes| {
            let pending = serializer.deserialize::<T>(&payload).map(&handler);
            async move { pending?.await }
        });

        let id = self.driver.subscribe(&topic, raw, replay).await?;
        self.registrations.insert(id, topic.clone());
        debug!(topic = %topic, subscription = %id, %replay, "Subscribed");

        Ok(SubscriptionHandle { topic, id })
    }

    /// Remove the registration behind `handle`
    ///
    /// Unknown or already removed handles are ignored.
    pub async fn unsubscribe(&self, handle: &SubscriptionHandle) -> Result<()> {
        let Some((id, topic)) = self.registrations.remove(&handle.id) else {
            debug!(subscription = %handle.id, "Ignoring unknown subscription handle");
            return Ok(());
        };
        self.driver.unsubscribe(&topic, id).await?;
        debug!(topic = %topic, subscription = %id, "Unsubscribed");
        Ok(())
    }
}

impl<S: MessageSerializer> fmt::Debug for MessageQueue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageQueue")
            .field("name", &self.name)
            .field("driver", &self.driver.name())
            .field("content_type", &self.serializer.content_type())
            .field("subscriptions", &self.registrations.len())
            .finish()
    }
}
