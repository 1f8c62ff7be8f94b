//! Driver Factory
//!
//! Maps the message queue configuration onto a concrete driver.
//!
//! **All driver implementations come from the mqb-providers crate.**
//! This factory only handles wiring.

use crate::config::{MessageQueueConfig, MqDriver};
use mqb_domain::error::{Error, Result};
use mqb_domain::ports::MessageDriver;
use mqb_providers::drivers::{InMemoryMessageDriver, NullMessageDriver};
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "driver-amqp")]
use mqb_providers::drivers::{AmqpDriverOptions, AmqpMessageDriver};
#[cfg(feature = "driver-mqtt")]
use mqb_providers::drivers::{MqttDriverOptions, MqttMessageDriver};

/// Factory for creating message drivers
pub struct MessageDriverFactory;

impl MessageDriverFactory {
    /// Create a driver based on configuration
    ///
    /// The returned driver is not connected yet.
    pub fn create(config: &MessageQueueConfig) -> Result<Arc<dyn MessageDriver>> {
        crate::config::loader::validate_message_queue_config(config)?;

        let driver: Arc<dyn MessageDriver> = match config.driver {
            MqDriver::None => {
                warn!("Message queue is disabled, messages will not be delivered");
                Arc::new(NullMessageDriver::new())
            }
            MqDriver::Memory => Arc::new(InMemoryMessageDriver::with_history_limit(
                config.history_cap(),
            )),
            MqDriver::Mqtt => Self::create_mqtt(config)?,
            MqDriver::Rabbitmq => Self::create_amqp(config)?,
        };

        info!(driver = %config.driver, queue = %config.name, "Message driver created");
        Ok(driver)
    }

    fn require_endpoint(config: &MessageQueueConfig) -> Result<(String, u16)> {
        let host = config
            .host
            .clone()
            .ok_or_else(|| Error::configuration(format!("Driver '{}' requires a host", config.driver)))?;
        let port = config
            .effective_port()
            .ok_or_else(|| Error::configuration(format!("Driver '{}' requires a port", config.driver)))?;
        Ok((host, port))
    }

    #[cfg(feature = "driver-mqtt")]
    fn create_mqtt(config: &MessageQueueConfig) -> Result<Arc<dyn MessageDriver>> {
        let (host, port) = Self::require_endpoint(config)?;
        let mut options = MqttDriverOptions::new(config.name.clone(), host, port);
        options.keep_alive = config.keep_alive();
        options.connect_timeout = config.connect_timeout();
        options.channel_capacity = config.channel_capacity;
        Ok(Arc::new(MqttMessageDriver::new(options)))
    }

    #[cfg(not(feature = "driver-mqtt"))]
    fn create_mqtt(config: &MessageQueueConfig) -> Result<Arc<dyn MessageDriver>> {
        Self::require_endpoint(config)?;
        Err(Error::configuration(
            "Driver 'mqtt' is not available (built without the driver-mqtt feature)",
        ))
    }

    #[cfg(feature = "driver-amqp")]
    fn create_amqp(config: &MessageQueueConfig) -> Result<Arc<dyn MessageDriver>> {
        let (host, port) = Self::require_endpoint(config)?;
        let mut options = AmqpDriverOptions::new(config.name.clone(), host, port);
        options.exchange = config.exchange.clone();
        options.connect_timeout = config.connect_timeout();
        Ok(Arc::new(AmqpMessageDriver::new(options)))
    }

    #[cfg(not(feature = "driver-amqp"))]
    fn create_amqp(config: &MessageQueueConfig) -> Result<Arc<dyn MessageDriver>> {
        Self::require_endpoint(config)?;
        Err(Error::configuration(
            "Driver 'rabbitmq' is not available (built without the driver-amqp feature)",
        ))
    }
}
