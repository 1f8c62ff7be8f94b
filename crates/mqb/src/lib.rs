//! # mqb
//!
//! Transport-agnostic publish/subscribe message bus.
//!
//! Producers publish typed values on named topics, consumers subscribe with a
//! replay policy, and the transport underneath is chosen by configuration:
//! disabled, in-process with history, MQTT or AMQP.
//!
//! ## Example
//!
//! ```ignore
//! use mqb::{ReplayPosition, infrastructure::{ConfigLoader, build_message_queue}};
//!
//! let config = ConfigLoader::new().load()?;
//! let queue = build_message_queue(&config.message_queue)?;
//! queue.connect().await?;
//! queue.publish(mqb::topics::CHAT, &message).await?;
//! let handle = queue
//!     .subscribe(mqb::topics::CHAT, ReplayPosition::FromBeginning, |msg: ChatMessage| async move {
//!         println!("{}", msg.message);
//!         Ok(())
//!     })
//!     .await?;
//! queue.unsubscribe(&handle).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - ports, value objects, errors and the topic catalog
//! - `application` - the typed `MessageQueue` facade
//! - `providers` - drivers and serializers
//! - `infrastructure` - configuration, logging, wiring and lifecycle

pub mod cli;

/// Domain layer - ports, value objects and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use mqb_domain::*;
}

/// Application layer - message queue facade
pub mod application {
    pub use mqb_application::*;
}

/// Provider layer - drivers and serializers
pub mod providers {
    pub use mqb_providers::*;
}

/// Infrastructure layer - config, logging and lifecycle
pub mod infrastructure {
    pub use mqb_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

pub use application::{MessageQueue, SubscriptionHandle};
