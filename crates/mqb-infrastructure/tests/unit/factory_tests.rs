//! Driver Factory and Bootstrap Tests

use mqb_domain::error::Error;
use mqb_domain::value_objects::ReplayPosition;
use mqb_infrastructure::config::{MessageQueueConfig, MqDriver};
use mqb_infrastructure::di::{MessageDriverFactory, build_message_queue};
use mqb_providers::serialization::SerializerKind;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

#[test]
fn test_none_driver_is_null_object() {
    let driver = MessageDriverFactory::create(&MessageQueueConfig::default()).unwrap();

    assert_eq!(driver.name(), "none");
    assert!(driver.is_connected());
    assert!(!driver.supports_replay());
}

#[test]
fn test_memory_driver_supports_replay() {
    let driver = MessageDriverFactory::create(&MessageQueueConfig::memory()).unwrap();

    assert_eq!(driver.name(), "memory");
    assert!(driver.supports_replay());
}

#[cfg(feature = "driver-mqtt")]
#[test]
fn test_mqtt_driver_starts_disconnected() {
    let driver = MessageDriverFactory::create(&MessageQueueConfig::mqtt("localhost")).unwrap();

    assert_eq!(driver.name(), "mqtt");
    assert!(!driver.is_connected());
    assert!(!driver.supports_replay());
}

#[cfg(feature = "driver-amqp")]
#[test]
fn test_rabbitmq_driver_starts_disconnected() {
    let driver = MessageDriverFactory::create(&MessageQueueConfig::rabbitmq("localhost")).unwrap();

    assert_eq!(driver.name(), "rabbitmq");
    assert!(!driver.is_connected());
}

#[test]
fn test_broker_config_without_host_is_rejected() {
    let config = MessageQueueConfig {
        driver: MqDriver::Mqtt,
        ..Default::default()
    };

    let err = MessageDriverFactory::create(&config).err().unwrap();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_empty_name_is_rejected() {
    let config = MessageQueueConfig {
        name: "  ".to_string(),
        ..MessageQueueConfig::memory()
    };

    assert!(MessageDriverFactory::create(&config).is_err());
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
struct ChatMessage {
    message: String,
    nick: String,
}

#[tokio::test]
async fn test_built_queue_round_trips_typed_messages() {
    let mut config = MessageQueueConfig::memory();
    config.name = "Ixian".to_string();
    config.serializer = SerializerKind::MsgPack;

    let queue = build_message_queue(&config).unwrap();
    assert_eq!(queue.name(), "Ixian");
    assert_eq!(queue.driver().name(), "memory");
    assert_eq!(queue.serializer().kind(), SerializerKind::MsgPack);

    queue.connect().await.unwrap();
    let sent = ChatMessage {
        message: "hello".to_string(),
        nick: "ix".to_string(),
    };
    queue.publish("chat", &sent).await.unwrap();

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    queue
        .subscribe("chat", ReplayPosition::FromBeginning, move |msg: ChatMessage| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().unwrap().push(msg);
                Ok::<(), Error>(())
            }
        })
        .await
        .unwrap();

    // Replay finishes before subscribe returns
    assert_eq!(*received.lock().unwrap(), vec![sent]);
    queue.disconnect().await.unwrap();
}

#[test]
fn test_build_propagates_configuration_errors() {
    let config = MessageQueueConfig {
        driver: MqDriver::Rabbitmq,
        host: Some(String::new()),
        ..Default::default()
    };

    assert!(build_message_queue(&config).is_err());
}
