//! Queue Lifecycle Tests

use mqb_infrastructure::config::MessageQueueConfig;
use mqb_infrastructure::di::{QueueLifecycle, build_message_queue};
use std::sync::Arc;
use std::time::Duration;

fn lifecycle() -> Arc<QueueLifecycle<mqb_providers::serialization::AnySerializer>> {
    let queue = build_message_queue(&MessageQueueConfig::memory()).unwrap();
    Arc::new(QueueLifecycle::new(Arc::new(queue)))
}

#[tokio::test]
async fn test_start_connects_and_shutdown_disconnects() {
    let lifecycle = lifecycle();

    lifecycle.start().await.unwrap();
    assert!(lifecycle.queue().is_connected());
    assert!(!lifecycle.is_shutting_down());

    lifecycle.shutdown().await.unwrap();
    assert!(!lifecycle.queue().is_connected());
    assert!(lifecycle.is_shutting_down());
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let lifecycle = lifecycle();
    lifecycle.start().await.unwrap();

    lifecycle.shutdown().await.unwrap();
    lifecycle.shutdown().await.unwrap();
    assert!(!lifecycle.queue().is_connected());
}

#[tokio::test]
async fn test_signal_shutdown_ends_run_until_signal() {
    let lifecycle = lifecycle();
    lifecycle.start().await.unwrap();

    let runner = Arc::clone(&lifecycle);
    let running = tokio::spawn(async move { runner.run_until_signal().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!running.is_finished());

    lifecycle.signal_shutdown();
    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("run_until_signal did not return")
        .unwrap()
        .unwrap();
    assert!(!lifecycle.queue().is_connected());
}

#[tokio::test]
async fn test_wait_returns_immediately_after_signal() {
    let lifecycle = lifecycle();
    lifecycle.signal_shutdown();

    tokio::time::timeout(Duration::from_secs(1), lifecycle.wait_for_shutdown())
        .await
        .unwrap();
}
