//! # mqb - Provider Implementations
//!
//! Concrete transports and encodings behind the ports defined in
//! `mqb-domain`. Each driver is an independent strategy selected at
//! construction time.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Drivers | `MessageDriver` | Null, InMemory, Mqtt, Amqp |
//! | Serializers | `MessageSerializer` | Json, MsgPack, Any |
//!
//! ## Feature Flags
//!
//! Broker drivers can be disabled for minimal builds:
//!
//! ```toml
//! [dependencies]
//! mqb-providers = { version = "0.1", default-features = false, features = ["driver-mqtt"] }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use mqb_providers::drivers::InMemoryMessageDriver;
//! use mqb_providers::serialization::JsonMessageSerializer;
//! ```

// Re-export mqb-domain types commonly used with providers
pub use mqb_domain::error::{Error, Result};
pub use mqb_domain::ports::{MessageDriver, MessageSerializer};

/// Transport driver implementations
///
/// Implements `MessageDriver` for the in-process and broker transports.
pub mod drivers;

/// Payload serializer implementations
pub mod serialization;

pub use drivers::{InMemoryMessageDriver, NullMessageDriver};
pub use serialization::{
    AnySerializer, JsonMessageSerializer, MsgPackMessageSerializer, SerializerKind,
};
