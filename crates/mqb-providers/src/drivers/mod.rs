//! Message Driver Implementations
//!
//! Transport strategies implementing the `MessageDriver` port.
//!
//! ## Available Drivers
//!
//! | Driver | Replay | Use Case |
//! |--------|--------|----------|
//! | [`NullMessageDriver`] | No | Messaging disabled |
//! | [`InMemoryMessageDriver`] | Yes | Tests and single-process fan-out |
//! | [`MqttMessageDriver`] | No | MQTT brokers (feature `driver-mqtt`) |
//! | [`AmqpMessageDriver`] | No | AMQP brokers such as RabbitMQ (feature `driver-amqp`) |

pub mod dispatch;
pub mod memory;
pub mod null;

#[cfg(feature = "driver-amqp")]
pub mod amqp;
#[cfg(feature = "driver-mqtt")]
pub mod mqtt;

pub use dispatch::{SubscriptionWorker, TopicRegistry};
pub use memory::InMemoryMessageDriver;
pub use null::NullMessageDriver;

#[cfg(feature = "driver-amqp")]
pub use amqp::{AmqpDriverOptions, AmqpMessageDriver};
#[cfg(feature = "driver-mqtt")]
pub use mqtt::{MqttDriverOptions, MqttMessageDriver};
