//! Wiring
//!
//! Composition root for the message queue: driver selection, facade
//! construction and lifecycle.
//!
//! **ARCHITECTURE**: This module contains ONLY wiring logic.
//! Drivers and serializers are in mqb-providers.

pub mod bootstrap;
pub mod factory;
pub mod lifecycle;

pub use bootstrap::build_message_queue;
pub use factory::MessageDriverFactory;
pub use lifecycle::{QueueLifecycle, shutdown_on_signal};
