//! Configuration
//!
//! Typed configuration and the loader merging defaults, TOML and environment.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, LoggingConfig, MessageQueueConfig, MqDriver};
