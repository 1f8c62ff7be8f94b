//! Message queue configuration types

use crate::constants::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_KEEP_ALIVE_SECS,
};
use mqb_domain::constants::{
    AMQP_DEFAULT_PORT, DEFAULT_EXCHANGE_NAME, DEFAULT_HISTORY_LIMIT, DEFAULT_QUEUE_NAME,
    MQTT_DEFAULT_PORT,
};
use mqb_providers::serialization::SerializerKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Message queue driver types
///
/// Any other value fails configuration loading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MqDriver {
    /// Messaging disabled - every operation is a no-op
    #[default]
    None,
    /// In-process broker with replayable history
    #[serde(alias = "in-memory", alias = "in_memory")]
    Memory,
    /// MQTT broker
    Mqtt,
    /// AMQP broker (RabbitMQ)
    #[serde(alias = "amqp")]
    Rabbitmq,
}

impl MqDriver {
    /// Whether the driver talks to an external broker
    pub fn is_broker(self) -> bool {
        matches!(self, Self::Mqtt | Self::Rabbitmq)
    }

    /// Port used when none is configured
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::Mqtt => Some(MQTT_DEFAULT_PORT),
            Self::Rabbitmq => Some(AMQP_DEFAULT_PORT),
            Self::None | Self::Memory => None,
        }
    }
}

impl fmt::Display for MqDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Memory => "memory",
            Self::Mqtt => "mqtt",
            Self::Rabbitmq => "rabbitmq",
        };
        f.write_str(name)
    }
}

/// Message queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageQueueConfig {
    /// Queue name; MQTT client id and AMQP consumer tag prefix
    pub name: String,

    /// Transport driver
    pub driver: MqDriver,

    /// Broker host (required for broker drivers)
    pub host: Option<String>,

    /// Broker port; `0` or absent selects the protocol default
    pub port: Option<u16>,

    /// Payload encoding
    pub serializer: SerializerKind,

    /// Messages retained per topic by the in-memory driver; `0` keeps everything
    pub history_limit: usize,

    /// AMQP fanout exchange name
    pub exchange: String,

    /// Broker connection timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// MQTT keep-alive interval in seconds
    pub keep_alive_secs: u64,

    /// MQTT client request channel capacity
    pub channel_capacity: usize,
}

/// Returns default message queue configuration with:
/// - messaging disabled (`none` driver)
/// - JSON payloads
/// - 10 000 retained messages per topic for the in-memory driver
impl Default for MessageQueueConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_QUEUE_NAME.to_string(),
            driver: MqDriver::None,
            host: None,
            port: None,
            serializer: SerializerKind::Json,
            history_limit: DEFAULT_HISTORY_LIMIT,
            exchange: DEFAULT_EXCHANGE_NAME.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl MessageQueueConfig {
    /// Create config for the in-memory driver
    pub fn memory() -> Self {
        Self {
            driver: MqDriver::Memory,
            ..Default::default()
        }
    }

    /// Create config for an MQTT broker
    pub fn mqtt(host: impl Into<String>) -> Self {
        Self {
            driver: MqDriver::Mqtt,
            host: Some(host.into()),
            ..Default::default()
        }
    }

    /// Create config for an AMQP broker
    pub fn rabbitmq(host: impl Into<String>) -> Self {
        Self {
            driver: MqDriver::Rabbitmq,
            host: Some(host.into()),
            ..Default::default()
        }
    }

    /// Configured port, or the driver's default
    pub fn effective_port(&self) -> Option<u16> {
        self.port
            .filter(|port| *port != 0)
            .or_else(|| self.driver.default_port())
    }

    /// Retention cap for the in-memory driver
    pub fn history_cap(&self) -> Option<usize> {
        (self.history_limit > 0).then_some(self.history_limit)
    }

    /// Connection timeout as a `Duration`
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Keep-alive as a `Duration`
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}
