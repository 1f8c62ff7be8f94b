//! AMQP Message Driver
//!
//! Driver backed by an AMQP 0-9-1 broker (RabbitMQ) through `lapin`.
//!
//! ## Topology
//!
//! All traffic is published to a single fanout exchange with the topic name as
//! routing key. Every subscription declares its own server-named, exclusive,
//! auto-delete queue bound to that exchange, so each subscriber receives a full
//! copy of the traffic. A fanout exchange ignores routing keys, which is why
//! each consumer drops deliveries whose routing key is not its topic.
//!
//! Deliveries are auto-acknowledged on receipt. A handler failure does not
//! cause redelivery.
//!
//! ## Example
//!
//! ```ignore
//! use mqb_providers::drivers::{AmqpDriverOptions, AmqpMessageDriver};
//!
//! let driver = AmqpMessageDriver::new(AmqpDriverOptions::new("mqb", "localhost", 5672));
//! driver.publish(&topic, Bytes::from_static(b"{}")).await?; // connects on demand
//! ```

use super::dispatch::SubscriptionWorker;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::StreamExt;
use lapin::options::{
    BasicCancelOptions, BasicConsumeOptions, BasicPublishOptions, ExchangeDeclareOptions,
    QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use mqb_domain::constants::DEFAULT_EXCHANGE_NAME;
use mqb_domain::error::{Error, Result};
use mqb_domain::ports::{MessageDriver, RawHandler};
use mqb_domain::value_objects::{ReplayPosition, SubscriptionId, Topic};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

const DRIVER_NAME: &str = "rabbitmq";

/// AMQP reply code for a normal close
const REPLY_SUCCESS: u16 = 200;

/// Connection settings for [`AmqpMessageDriver`]
#[derive(Debug, Clone)]
pub struct AmqpDriverOptions {
    /// Prefix of consumer tags, normally the queue name
    pub name: String,
    /// Broker host name
    pub host: String,
    /// Broker port
    pub port: u16,
    /// Fanout exchange receiving all topic traffic
    pub exchange: String,
    /// Upper bound on establishing the connection
    pub connect_timeout: Duration,
}

impl AmqpDriverOptions {
    /// Options using the default exchange and timeout
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            exchange: DEFAULT_EXCHANGE_NAME.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Broker URI on the default virtual host
    pub fn uri(&self) -> String {
        format!("amqp://{}:{}/%2f", self.host, self.port)
    }
}

struct Session {
    connection: Connection,
    channel: Channel,
}

struct ActiveConsumer {
    topic: Topic,
    tag: String,
    task: JoinHandle<()>,
}

/// Message driver for AMQP brokers
pub struct AmqpMessageDriver {
    options: AmqpDriverOptions,
    session: RwLock<Option<Session>>,
    consumers: DashMap<SubscriptionId, ActiveConsumer>,
    connected: AtomicBool,
}

impl AmqpMessageDriver {
    /// Create a disconnected driver
    pub fn new(options: AmqpDriverOptions) -> Self {
        Self {
            options,
            session: RwLock::new(None),
            consumers: DashMap::new(),
            connected: AtomicBool::new(false),
        }
    }

    /// Configured exchange name
    pub fn exchange(&self) -> &str {
        &self.options.exchange
    }

    /// Number of active consumers
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    async fn channel(&self) -> Result<Channel> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.channel.clone())
            .ok_or_else(|| Error::not_connected(DRIVER_NAME))
    }

    async fn open_session(&self) -> Result<Session> {
        let uri = self.options.uri();
        info!("Connecting to AMQP broker at {}:{}", self.options.host, self.options.port);

        let connection = tokio::time::timeout(
            self.options.connect_timeout,
            Connection::connect(&uri, ConnectionProperties::default()),
        )
        .await
        .map_err(|_| {
            Error::transport(format!(
                "Timed out after {:?} connecting to AMQP broker at {}:{}",
                self.options.connect_timeout, self.options.host, self.options.port
            ))
        })?
        .map_err(|e| Error::transport_with_source("Failed to connect to AMQP broker", e))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| Error::transport_with_source("Failed to open AMQP channel", e))?;

        channel
            .exchange_declare(
                &self.options.exchange,
                ExchangeKind::Fanout,
                ExchangeDeclareOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                Error::transport_with_source(
                    format!("Failed to declare exchange '{}'", self.options.exchange),
                    e,
                )
            })?;

        Ok(Session {
            connection,
            channel,
        })
    }

    async fn cancel_consumer(channel: Option<&Channel>, consumer: ActiveConsumer) {
        if let Some(channel) = channel
            && let Err(e) = channel
                .basic_cancel(&consumer.tag, BasicCancelOptions::default())
                .await
        {
            warn!(topic = %consumer.topic, tag = %consumer.tag, error = %e, "Failed to cancel AMQP consumer");
        }
        consumer.task.abort();
    }
}

impl std::fmt::Debug for AmqpMessageDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmqpMessageDriver")
            .field("host", &self.options.host)
            .field("port", &self.options.port)
            .field("exchange", &self.options.exchange)
            .field("consumers", &self.consumers.len())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl MessageDriver for AmqpMessageDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn connect(&self) -> Result<()> {
        let mut session = self.session.write().await;
        if let Some(current) = session.as_ref() {
            if current.connection.status().connected() {
                return Ok(());
            }
            warn!("AMQP connection was lost, reconnecting");
        }

        *session = Some(self.open_session().await?);
        self.connected.store(true, Ordering::Release);
        info!(exchange = %self.options.exchange, "Connected to AMQP broker");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let session = self.session.write().await.take();
        self.connected.store(false, Ordering::Release);

        let ids: Vec<SubscriptionId> = self.consumers.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some((_, consumer)) = self.consumers.remove(&id) {
                Self::cancel_consumer(session.as_ref().map(|s| &s.channel), consumer).await;
            }
        }

        let Some(session) = session else {
            return Ok(());
        };

        if let Err(e) = session.channel.close(REPLY_SUCCESS, "Bye").await {
            warn!(error = %e, "Failed to close AMQP channel");
        }
        if let Err(e) = session.connection.close(REPLY_SUCCESS, "Bye").await {
            warn!(error = %e, "Failed to close AMQP connection");
        }
        info!("Disconnected from AMQP broker");
        Ok(())
    }

    async fn publish(&self, topic: &Topic, payload: Bytes) -> Result<()> {
        // Producers may publish before any consumer exists
        if !self.is_connected() {
            self.connect().await?;
        }
        let channel = self.channel().await?;

        channel
            .basic_publish(
                &self.options.exchange,
                topic.as_str(),
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default(),
            )
            .await
            .map_err(|e| {
                Error::transport_with_source(format!("Failed to publish to '{topic}'"), e)
            })?;
        trace!(topic = %topic, bytes = payload.len(), "Published AMQP message");
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &Topic,
        handler: RawHandler,
        replay: ReplayPosition,
    ) -> Result<SubscriptionId> {
        let channel = self.channel().await?;
        let id = SubscriptionId::new();
        let tag = format!("{}-{}", self.options.name, id.as_uuid());

        if replay != ReplayPosition::FromLast {
            debug!(topic = %topic, %replay, "AMQP keeps no history, delivering live messages only");
        }

        let queue = channel
            .queue_declare(
                "",
                QueueDeclareOptions {
                    exclusive: true,
                    auto_delete: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| Error::transport_with_source("Failed to declare AMQP queue", e))?;
        let queue_name = queue.name().as_str().to_string();

        channel
            .queue_bind(
                &queue_name,
                &self.options.exchange,
                topic.as_str(),
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                Error::transport_with_source(format!("Failed to bind queue for '{topic}'"), e)
            })?;

        let mut consumer = channel
            .basic_consume(
                &queue_name,
                &tag,
                BasicConsumeOptions {
                    no_ack: true,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                Error::transport_with_source(format!("Failed to consume from '{topic}'"), e)
            })?;

        let worker = SubscriptionWorker::spawn(topic, id, handler);
        let filter = topic.clone();
        let task = tokio::spawn(async move {
            while let Some(delivery) = consumer.next().await {
                match delivery {
                    Ok(delivery) => {
                        if delivery.routing_key.as_str() != filter.as_str() {
                            continue;
                        }
                        worker.deliver(Bytes::from(delivery.data));
                    }
                    Err(e) => {
                        warn!(topic = %filter, error = %e, "AMQP consumer failed");
                        break;
                    }
                }
            }
            trace!(topic = %filter, "AMQP consumer stopped");
        });

        self.consumers.insert(
            id,
            ActiveConsumer {
                topic: topic.clone(),
                tag,
                task,
            },
        );
        debug!(topic = %topic, queue = %queue_name, subscription = %id, "Subscribed to AMQP topic");
        Ok(id)
    }

    async fn unsubscribe(&self, topic: &Topic, id: SubscriptionId) -> Result<()> {
        let Some((_, consumer)) = self
            .consumers
            .remove_if(&id, |_, consumer| consumer.topic == *topic)
        else {
            return Ok(());
        };
        let channel = self.channel().await.ok();
        Self::cancel_consumer(channel.as_ref(), consumer).await;
        debug!(topic = %topic, subscription = %id, "Unsubscribed from AMQP topic");
        Ok(())
    }
}
