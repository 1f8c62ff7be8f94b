//! Null Driver Tests

use crate::test_utils::{Recorder, payload, settle};
use mqb_domain::ports::MessageDriver;
use mqb_domain::value_objects::{ReplayPosition, Topic};
use mqb_providers::NullMessageDriver;

#[tokio::test]
async fn test_null_driver_accepts_everything_and_delivers_nothing() {
    let driver = NullMessageDriver::new();
    let topic = Topic::new("Chat").unwrap();
    let recorder = Recorder::new();

    driver.connect().await.unwrap();
    driver.publish(&topic, payload("before")).await.unwrap();
    let id = driver
        .subscribe(&topic, recorder.handler(), ReplayPosition::FromBeginning)
        .await
        .unwrap();
    driver.publish(&topic, payload("after")).await.unwrap();
    driver.unsubscribe(&topic, id).await.unwrap();
    driver.disconnect().await.unwrap();
    driver.disconnect().await.unwrap();

    settle().await;
    assert!(recorder.messages().is_empty());
}

#[tokio::test]
async fn test_null_driver_works_without_connect() {
    let driver = NullMessageDriver::new();
    let topic = Topic::new("Nick").unwrap();

    assert_eq!(driver.name(), "none");
    assert!(!driver.supports_replay());
    driver.publish(&topic, payload("x")).await.unwrap();
}
