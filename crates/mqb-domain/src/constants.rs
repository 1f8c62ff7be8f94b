//! Domain layer constants
//!
//! Contains constants that are part of the messaging domain and are shared by
//! the application and provider layers. Infrastructure-specific constants
//! remain in `mqb_infrastructure::constants`.

// ============================================================================
// REPLAY CONSTANTS
// ============================================================================

/// Message count used by `FromLastN` when the subscriber supplies none
pub const REPLAY_DEFAULT_COUNT: usize = 1;

/// Start index used by `FromIndex` when the subscriber supplies none
pub const REPLAY_DEFAULT_INDEX: usize = 0;

// ============================================================================
// QUEUE CONSTANTS
// ============================================================================

/// Default queue name, also used as the MQTT client identifier
pub const DEFAULT_QUEUE_NAME: &str = "mqb";

/// Default number of messages retained per topic by the in-memory driver
pub const DEFAULT_HISTORY_LIMIT: usize = 10_000;

/// Default AMQP exchange receiving all topic traffic
pub const DEFAULT_EXCHANGE_NAME: &str = "app_exchange";

/// Default MQTT broker port
pub const MQTT_DEFAULT_PORT: u16 = 1883;

/// Default AMQP broker port
pub const AMQP_DEFAULT_PORT: u16 = 5672;
