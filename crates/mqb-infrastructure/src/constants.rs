//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Messaging defaults shared with other layers live in `mqb_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "mqb.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "mqb";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "MQB";

/// Separator between prefix and nested keys in environment variables
///
/// Double underscore, since field names contain single underscores
/// (`MQB__MESSAGE_QUEUE__HISTORY_LIMIT`).
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "MQB_LOG";

// ============================================================================
// BROKER CONNECTION CONSTANTS
// ============================================================================

/// Default broker connection timeout in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default MQTT keep-alive in seconds
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 30;

/// Default capacity of the MQTT client request channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
