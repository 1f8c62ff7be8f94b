//! Application use cases

pub mod message_queue;

pub use message_queue::{MessageQueue, SubscriptionHandle};
