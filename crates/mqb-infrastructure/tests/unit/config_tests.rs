//! Configuration Loader Tests

use mqb_domain::error::Error;
use mqb_infrastructure::config::{AppConfig, ConfigLoader, MessageQueueConfig, MqDriver};
use mqb_providers::serialization::SerializerKind;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn load(contents: &str) -> mqb_domain::Result<AppConfig> {
    let file = write_config(contents);
    ConfigLoader::new().with_config_path(file.path()).load()
}

#[test]
fn test_missing_file_yields_defaults() {
    let config = ConfigLoader::new()
        .with_config_path("/nonexistent/mqb.toml")
        .load()
        .unwrap();

    assert_eq!(config.message_queue.driver, MqDriver::None);
    assert_eq!(config.message_queue.name, "mqb");
    assert_eq!(config.message_queue.serializer, SerializerKind::Json);
    assert_eq!(config.message_queue.history_limit, 10_000);
    assert_eq!(config.message_queue.exchange, "app_exchange");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_toml_file_overrides_defaults() {
    let config = load(
        r#"
        [logging]
        level = "debug"

        [message_queue]
        name = "Ixian"
        driver = "mqtt"
        host = "broker.local"
        port = 1884
        serializer = "msgpack"
        keep_alive_secs = 5
        "#,
    )
    .unwrap();

    let mq = &config.message_queue;
    assert_eq!(config.logging.level, "debug");
    assert_eq!(mq.name, "Ixian");
    assert_eq!(mq.driver, MqDriver::Mqtt);
    assert_eq!(mq.host.as_deref(), Some("broker.local"));
    assert_eq!(mq.effective_port(), Some(1884));
    assert_eq!(mq.serializer, SerializerKind::MsgPack);
    assert_eq!(mq.keep_alive(), Duration::from_secs(5));
    // Untouched keys keep their defaults
    assert_eq!(mq.exchange, "app_exchange");
}

#[test]
fn test_amqp_is_an_alias_for_rabbitmq() {
    let config = load(
        r#"
        [message_queue]
        driver = "amqp"
        host = "rabbit"
        "#,
    )
    .unwrap();

    assert_eq!(config.message_queue.driver, MqDriver::Rabbitmq);
    assert_eq!(config.message_queue.effective_port(), Some(5672));
}

#[test]
fn test_unknown_driver_is_fatal() {
    let err = load(
        r#"
        [message_queue]
        driver = "kafka"
        "#,
    )
    .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
}

#[test]
fn test_broker_driver_requires_host() {
    for driver in ["mqtt", "rabbitmq"] {
        let err = load(&format!("[message_queue]\ndriver = \"{driver}\"\n")).unwrap_err();
        match err {
            Error::Configuration { message, .. } => assert!(message.contains("requires a host")),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }
}

#[test]
fn test_memory_driver_needs_no_host() {
    let config = load("[message_queue]\ndriver = \"memory\"\nhistory_limit = 0\n").unwrap();

    assert_eq!(config.message_queue.driver, MqDriver::Memory);
    assert_eq!(config.message_queue.history_cap(), None);
    assert_eq!(config.message_queue.effective_port(), None);
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let err = load("[logging]\nlevel = \"loud\"\n").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mqb.toml");
    let mut config = AppConfig::default();
    config.message_queue = MessageQueueConfig::rabbitmq("rabbit.internal");
    config.message_queue.exchange = "events".to_string();

    let loader = ConfigLoader::new().with_config_path(&path);
    loader.save_to_file(&config, &path).unwrap();
    let loaded = loader.load().unwrap();

    assert_eq!(loaded.message_queue.driver, MqDriver::Rabbitmq);
    assert_eq!(loaded.message_queue.host.as_deref(), Some("rabbit.internal"));
    assert_eq!(loaded.message_queue.exchange, "events");
    assert_eq!(loader.config_path(), Some(path.as_path()));
}

#[test]
fn test_port_zero_means_protocol_default() {
    let mut config = MessageQueueConfig::mqtt("broker");
    config.port = Some(0);
    assert_eq!(config.effective_port(), Some(1883));
}

#[test]
#[ignore = "mutates process environment"]
fn test_environment_overrides_file() {
    let file = write_config("[message_queue]\ndriver = \"memory\"\n");
    // SAFETY: test is ignored by default and run single-threaded on demand
    unsafe {
        std::env::set_var("MQBTEST__MESSAGE_QUEUE__DRIVER", "mqtt");
        std::env::set_var("MQBTEST__MESSAGE_QUEUE__HOST", "env-broker");
    }

    let config = ConfigLoader::new()
        .with_env_prefix("MQBTEST")
        .with_config_path(file.path())
        .load();

    unsafe {
        std::env::remove_var("MQBTEST__MESSAGE_QUEUE__DRIVER");
        std::env::remove_var("MQBTEST__MESSAGE_QUEUE__HOST");
    }

    let config = config.unwrap();
    assert_eq!(config.message_queue.driver, MqDriver::Mqtt);
    assert_eq!(config.message_queue.host.as_deref(), Some("env-broker"));
}
