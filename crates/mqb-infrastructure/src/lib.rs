//! # mqb Infrastructure Layer
//!
//! Cross-cutting technical concerns around the message queue.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration (defaults, TOML, `MQB__` environment) |
//! | [`logging`] | tracing-subscriber setup |
//! | [`error_ext`] | Context extensions mapping foreign errors to the domain error |
//! | [`di`] | Driver factory, queue bootstrap and lifecycle |
//! | [`constants`] | Infrastructure defaults |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

pub use config::{AppConfig, ConfigLoader, LoggingConfig, MessageQueueConfig, MqDriver};
pub use di::{MessageDriverFactory, QueueLifecycle, build_message_queue, shutdown_on_signal};
pub use error_ext::ErrorContext;
pub use logging::{init_logging, parse_log_level};
