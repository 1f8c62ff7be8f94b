//! Structured logging with tracing
//!
//! One subscriber per process: an `EnvFilter` (overridable through `MQB_LOG`),
//! a stdout layer, and an optional daily-rolling file layer, each in plain or
//! JSON format. Broker client crates are capped at `warn` unless `MQB_LOG`
//! says otherwise.

use crate::constants::LOG_FILTER_ENV;
use mqb_domain::error::{Error, Result};
use std::path::Path;
use tracing::{Level, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

// Re-export LoggingConfig for convenience
pub use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Targets kept at `warn` by default
const QUIET_TARGETS: &[&str] = &["rumqttc", "lapin", "amq_protocol", "async_io", "polling"];

/// File name used when `file_output` has none
const DEFAULT_LOG_FILE: &str = "mqb.log";

/// Initialize logging with the provided configuration
///
/// Fails if the level is invalid or a global subscriber is already set.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer(config.json_format)];
    if let Some(path) = &config.file_output {
        layers.push(file_layer(path, config.json_format));
    }

    Registry::default()
        .with(layers)
        .with(build_filter(level))
        .try_init()
        .map_err(|e| {
            Error::configuration_with_source("Failed to install global tracing subscriber", e)
        })?;

    info!(
        level = %level,
        json = config.json_format,
        file = ?config.file_output,
        "Logging initialized"
    );
    Ok(())
}

/// Filter from `MQB_LOG`, or `level` with broker clients capped at `warn`
pub fn build_filter(level: Level) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) {
        return filter;
    }
    let directives = std::iter::once(level.as_str().to_lowercase())
        .chain(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(directives)
}

fn stdout_layer(json: bool) -> BoxedLayer {
    let layer = fmt::layer().with_target(true).with_thread_ids(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn file_layer(path: &Path, json: bool) -> BoxedLayer {
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map_or_else(|| DEFAULT_LOG_FILE.into(), |name| name.to_os_string());
    let appender = tracing_appender::rolling::daily(directory, file_name);

    let layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}
