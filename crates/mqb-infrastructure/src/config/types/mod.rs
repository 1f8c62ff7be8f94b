//! Configuration types module

pub mod app;
pub mod logging;
pub mod message_queue;

// Re-export main types
pub use app::AppConfig;
pub use logging::LoggingConfig;
pub use message_queue::{MessageQueueConfig, MqDriver};
