//! MQTT Message Driver
//!
//! Driver backed by an MQTT broker through `rumqttc`.
//!
//! ## Features
//!
//! - One broker subscription per topic, shared by all local handlers
//! - At-least-once (QoS 1) subscriptions
//! - Topics re-subscribed after an automatic reconnect
//! - Auto-connect on publish
//! - Client requests bounded by `connect_timeout`, so a dead broker fails
//!   calls instead of stalling them on a full request channel
//!
//! MQTT retains no history the driver could select from, so every replay
//! position behaves as live-only delivery.
//!
//! ## Example
//!
//! ```ignore
//! use mqb_providers::drivers::{MqttDriverOptions, MqttMessageDriver};
//!
//! let driver = MqttMessageDriver::new(MqttDriverOptions::new("mqb", "localhost", 1883));
//! driver.connect().await?;
//! driver.publish(&topic, Bytes::from_static(b"{}")).await?;
//! ```

use super::dispatch::{SubscriptionWorker, TopicRegistry};
use async_trait::async_trait;
use bytes::Bytes;
use mqb_domain::error::{Error, Result};
use mqb_domain::ports::{MessageDriver, RawHandler};
use mqb_domain::value_objects::{ReplayPosition, SubscriptionId, Topic};
use rumqttc::{
    AsyncClient, ClientError, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet,
    QoS,
};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

const DRIVER_NAME: &str = "mqtt";

/// Pause between event loop polls after a connection error
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// How long `disconnect` waits for the event loop to flush the DISCONNECT packet
const DISCONNECT_GRACE: Duration = Duration::from_secs(1);

/// Connection settings for [`MqttMessageDriver`]
#[derive(Debug, Clone)]
pub struct MqttDriverOptions {
    /// Client identifier presented to the broker
    pub client_id: String,
    /// Broker host name
    pub host: String,
    /// Broker port
    pub port: u16,
    /// MQTT keep-alive interval
    pub keep_alive: Duration,
    /// Upper bound on waiting for CONNACK
    pub connect_timeout: Duration,
    /// Capacity of the request channel between client and event loop
    pub channel_capacity: usize,
}

impl MqttDriverOptions {
    /// Options with default keep-alive, timeout and capacity
    pub fn new(client_id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            client_id: client_id.into(),
            host: host.into(),
            port,
            keep_alive: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            channel_capacity: 64,
        }
    }

    fn mqtt_options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(true);
        options
    }
}

struct Session {
    client: AsyncClient,
    event_loop: JoinHandle<()>,
}

/// Message driver for MQTT brokers
pub struct MqttMessageDriver {
    options: MqttDriverOptions,
    session: Mutex<Option<Session>>,
    /// Serializes first-subscribe / last-unsubscribe broker requests
    topic_changes: Mutex<()>,
    registry: Arc<TopicRegistry>,
    connected: Arc<AtomicBool>,
}

impl MqttMessageDriver {
    /// Create a disconnected driver
    pub fn new(options: MqttDriverOptions) -> Self {
        Self {
            options,
            session: Mutex::new(None),
            topic_changes: Mutex::new(()),
            registry: Arc::new(TopicRegistry::new()),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Broker address as `host:port`
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.options.host, self.options.port)
    }

    /// Topics with at least one local handler
    pub fn subscribed_topics(&self) -> Vec<String> {
        self.registry.topics()
    }

    async fn client(&self) -> Result<AsyncClient> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|session| session.client.clone())
            .ok_or_else(|| Error::not_connected(DRIVER_NAME))
    }

    /// Hand a request to the event loop, failing once `connect_timeout` passes
    ///
    /// The request channel is bounded and only drained while a connection is
    /// up, so an unreachable broker would otherwise park the caller forever.
    async fn send_request<F>(&self, action: String, request: F) -> Result<()>
    where
        F: Future<Output = std::result::Result<(), ClientError>>,
    {
        match tokio::time::timeout(self.options.connect_timeout, request).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::transport_with_source(action, e)),
            Err(_) => Err(Error::transport(format!(
                "{action}: broker at {} did not take the request within {:?}",
                self.endpoint(),
                self.options.connect_timeout
            ))),
        }
    }
}

impl std::fmt::Debug for MqttMessageDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttMessageDriver")
            .field("endpoint", &self.endpoint())
            .field("client_id", &self.options.client_id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl MessageDriver for MqttMessageDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn connect(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Ok(());
        }

        info!("Connecting to MQTT broker at {}", self.endpoint());

        let (client, event_loop) =
            AsyncClient::new(self.options.mqtt_options(), self.options.channel_capacity);
        let (ready_tx, ready_rx) = oneshot::channel();
        let task = tokio::spawn(run_event_loop(
            event_loop,
            client.clone(),
            Arc::clone(&self.registry),
            Arc::clone(&self.connected),
            ready_tx,
        ));

        let outcome = match tokio::time::timeout(self.options.connect_timeout, ready_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::transport("MQTT event loop exited before CONNACK")),
            Err(_) => Err(Error::transport(format!(
                "Timed out after {:?} connecting to MQTT broker at {}",
                self.options.connect_timeout,
                self.endpoint()
            ))),
        };

        if let Err(e) = outcome {
            task.abort();
            self.connected.store(false, Ordering::Release);
            return Err(e);
        }

        *session = Some(Session {
            client,
            event_loop: task,
        });
        info!("Connected to MQTT broker at {}", self.endpoint());
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let session = self.session.lock().await.take();
        self.registry.clear();
        self.connected.store(false, Ordering::Release);

        let Some(Session {
            client,
            mut event_loop,
        }) = session
        else {
            return Ok(());
        };

        // Never wait on the request channel here, it is full when the broker is gone
        if let Err(e) = client.try_disconnect() {
            warn!(error = %e, "Failed to queue MQTT DISCONNECT");
        }
        if tokio::time::timeout(DISCONNECT_GRACE, &mut event_loop)
            .await
            .is_err()
        {
            event_loop.abort();
        }
        info!("Disconnected from MQTT broker at {}", self.endpoint());
        Ok(())
    }

    async fn publish(&self, topic: &Topic, payload: Bytes) -> Result<()> {
        if !self.is_connected() {
            self.connect().await?;
        }
        let client = self.client().await?;

        self.send_request(
            format!("Failed to publish to '{topic}'"),
            client.publish(topic.as_str(), QoS::AtLeastOnce, false, payload.to_vec()),
        )
        .await?;
        trace!(topic = %topic, "Published MQTT message");
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &Topic,
        handler: RawHandler,
        replay: ReplayPosition,
    ) -> Result<SubscriptionId> {
        let client = self.client().await?;
        let id = SubscriptionId::new();

        if replay != ReplayPosition::FromLast {
            debug!(topic = %topic, %replay, "MQTT keeps no history, delivering live messages only");
        }

        let worker = SubscriptionWorker::spawn(topic, id, handler);
        let _changing = self.topic_changes.lock().await;
        if self.registry.register(topic, worker) {
            let subscribed = self
                .send_request(
                    format!("Failed to subscribe to '{topic}'"),
                    client.subscribe(topic.as_str(), QoS::AtLeastOnce),
                )
                .await;
            if let Err(e) = subscribed {
                self.registry.deregister(topic, id);
                return Err(e);
            }
            debug!(topic = %topic, "Subscribed to MQTT topic");
        }
        Ok(id)
    }

    async fn unsubscribe(&self, topic: &Topic, id: SubscriptionId) -> Result<()> {
        // Held until UNSUBSCRIBE is queued so a racing first subscribe
        // cannot have its SUBSCRIBE overtaken
        let _changing = self.topic_changes.lock().await;
        if self.registry.deregister(topic, id) != Some(true) {
            return Ok(());
        }
        // Last local handler gone, drop the broker subscription
        if let Ok(client) = self.client().await {
            self.send_request(
                format!("Failed to unsubscribe from '{topic}'"),
                client.unsubscribe(topic.as_str()),
            )
            .await?;
            debug!(topic = %topic, "Unsubscribed from MQTT topic");
        }
        Ok(())
    }
}

async fn run_event_loop(
    mut event_loop: EventLoop,
    client: AsyncClient,
    registry: Arc<TopicRegistry>,
    connected: Arc<AtomicBool>,
    ready: oneshot::Sender<Result<()>>,
) {
    let mut ready = Some(ready);

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code != ConnectReturnCode::Success {
                    let err = Error::transport(format!("MQTT broker refused connection: {:?}", ack.code));
                    if let Some(ready) = ready.take() {
                        let _ = ready.send(Err(err));
                        return;
                    }
                    warn!(code = ?ack.code, "MQTT broker refused reconnection");
                    continue;
                }

                connected.store(true, Ordering::Release);
                match ready.take() {
                    Some(ready) => {
                        let _ = ready.send(Ok(()));
                    }
                    None => {
                        // Clean session: the broker forgot our subscriptions
                        for topic in registry.topics() {
                            if let Err(e) = client.try_subscribe(topic.as_str(), QoS::AtLeastOnce) {
                                warn!(topic = %topic, error = %e, "Failed to restore MQTT subscription");
                            }
                        }
                        info!("Reconnected to MQTT broker");
                    }
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let delivered = registry.dispatch(&publish.topic, &publish.payload);
                trace!(topic = %publish.topic, delivered, "Received MQTT message");
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                connected.store(false, Ordering::Release);
                debug!("MQTT event loop stopped");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                connected.store(false, Ordering::Release);
                if let Some(ready) = ready.take() {
                    let _ = ready.send(Err(Error::transport_with_source(
                        "Failed to connect to MQTT broker",
                        e,
                    )));
                    return;
                }
                warn!(error = %e, "MQTT connection lost, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}
