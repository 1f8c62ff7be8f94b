//! Main application configuration

use super::logging::LoggingConfig;
use super::message_queue::MessageQueueConfig;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Message queue configuration
    pub message_queue: MessageQueueConfig,
}
