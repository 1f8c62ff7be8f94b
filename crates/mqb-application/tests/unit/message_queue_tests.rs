//! Message Queue Facade Tests

use mqb_application::MessageQueue;
use mqb_domain::error::{Error, Result};
use mqb_domain::ports::{MessageDriver, MessageSerializer};
use mqb_domain::value_objects::ReplayPosition;
use mqb_providers::{
    InMemoryMessageDriver, JsonMessageSerializer, MsgPackMessageSerializer, NullMessageDriver,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Chat {
    from: String,
    text: String,
}

fn chat(text: &str) -> Chat {
    Chat {
        from: "alice".to_string(),
        text: text.to_string(),
    }
}

type Inbox = Arc<Mutex<Vec<Chat>>>;

fn memory_queue() -> (MessageQueue<JsonMessageSerializer>, Arc<InMemoryMessageDriver>) {
    let driver = Arc::new(InMemoryMessageDriver::new());
    let queue = MessageQueue::new("test", driver.clone(), JsonMessageSerializer::new());
    (queue, driver)
}

fn collect_into(inbox: &Inbox) -> impl Fn(Chat) -> std::future::Ready<Result<()>> + Send + Sync + 'static {
    let inbox = Arc::clone(inbox);
    move |message: Chat| {
        inbox.lock().unwrap().push(message);
        std::future::ready(Ok(()))
    }
}

fn texts(inbox: &Inbox) -> Vec<String> {
    inbox.lock().unwrap().iter().map(|m| m.text.clone()).collect()
}

async fn wait_for(inbox: &Inbox, count: usize) -> Vec<String> {
    for _ in 0..500 {
        if inbox.lock().unwrap().len() >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    texts(inbox)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_chat_scenario_hello_world_again() {
    let (queue, _) = memory_queue();
    queue.connect().await.unwrap();
    let inbox = Inbox::default();

    queue.publish("chat", &chat("hello")).await.unwrap();

    let handle = queue
        .subscribe("chat", ReplayPosition::FromBeginning, collect_into(&inbox))
        .await
        .unwrap();
    assert_eq!(texts(&inbox), vec!["hello"]);

    queue.publish("chat", &chat("world")).await.unwrap();
    assert_eq!(wait_for(&inbox, 2).await, vec!["hello", "world"]);

    queue.unsubscribe(&handle).await.unwrap();
    queue.publish("chat", &chat("again")).await.unwrap();
    settle().await;
    assert_eq!(texts(&inbox), vec!["hello", "world"]);
    assert_eq!(inbox.lock().unwrap()[0], chat("hello"));
}

#[tokio::test]
async fn test_unsubscribe_leaves_no_registration() {
    let (queue, driver) = memory_queue();
    let inbox = Inbox::default();

    let handle = queue
        .subscribe("Chat", ReplayPosition::FromLast, collect_into(&inbox))
        .await
        .unwrap();
    assert_eq!(queue.subscription_count(), 1);
    assert_eq!(driver.subscriber_count("Chat"), 1);
    assert_eq!(handle.topic().as_str(), "Chat");

    queue.unsubscribe(&handle).await.unwrap();
    assert_eq!(queue.subscription_count(), 0);
    assert_eq!(driver.subscriber_count("Chat"), 0);

    // Second unsubscribe is a no-op
    queue.unsubscribe(&handle).await.unwrap();
}

#[tokio::test]
async fn test_same_handler_registered_twice_is_removed_independently() {
    let (queue, _) = memory_queue();
    let inbox = Inbox::default();
    let handler = collect_into(&inbox);
    let shared = Arc::new(handler);

    let first = {
        let shared = Arc::clone(&shared);
        queue
            .subscribe("Chat", ReplayPosition::FromLast, move |m: Chat| shared(m))
            .await
            .unwrap()
    };
    let second = {
        let shared = Arc::clone(&shared);
        queue
            .subscribe("Chat", ReplayPosition::FromLast, move |m: Chat| shared(m))
            .await
            .unwrap()
    };
    assert_ne!(first, second);

    queue.publish("Chat", &chat("both")).await.unwrap();
    assert_eq!(wait_for(&inbox, 2).await, vec!["both", "both"]);

    queue.unsubscribe(&first).await.unwrap();
    queue.publish("Chat", &chat("one")).await.unwrap();
    assert_eq!(wait_for(&inbox, 3).await, vec!["both", "both", "one"]);
    settle().await;
    assert_eq!(inbox.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_undecodable_payload_does_not_stop_delivery() {
    let (queue, _) = memory_queue();
    let inbox = Inbox::default();
    queue
        .subscribe("Chat", ReplayPosition::FromLast, collect_into(&inbox))
        .await
        .unwrap();

    // Wrong shape for `Chat`
    queue.publish("Chat", &42).await.unwrap();
    queue.publish("Chat", &chat("ok")).await.unwrap();

    assert_eq!(wait_for(&inbox, 1).await, vec!["ok"]);
}

#[tokio::test]
async fn test_handler_error_does_not_affect_other_subscribers() {
    let (queue, _) = memory_queue();
    let inbox = Inbox::default();
    queue
        .subscribe("Chat", ReplayPosition::FromLast, |message: Chat| async move {
            Err::<(), Error>(Error::handler(format!("cannot handle {}", message.text)))
        })
        .await
        .unwrap();
    queue
        .subscribe("Chat", ReplayPosition::FromLast, collect_into(&inbox))
        .await
        .unwrap();

    queue.publish("Chat", &chat("m")).await.unwrap();
    queue.publish("Chat", &chat("m+1")).await.unwrap();

    assert_eq!(wait_for(&inbox, 2).await, vec!["m", "m+1"]);
}

#[tokio::test]
async fn test_replay_positions_through_facade() {
    let (queue, _) = memory_queue();
    for text in ["m1", "m2", "m3", "m4"] {
        queue.publish("Chat", &chat(text)).await.unwrap();
    }

    let cases = [
        (ReplayPosition::FromBeginning, vec!["m1", "m2", "m3", "m4"]),
        (ReplayPosition::FromLast, vec!["m4"]),
        (ReplayPosition::FromLastN(2), vec!["m3", "m4"]),
        (ReplayPosition::FromIndex(1), vec!["m2", "m3", "m4"]),
        (ReplayPosition::FromIndex(9), vec![]),
    ];
    for (replay, expected) in cases {
        let inbox = Inbox::default();
        queue
            .subscribe("Chat", replay, collect_into(&inbox))
            .await
            .unwrap();
        assert_eq!(texts(&inbox), expected, "{replay}");
    }
}

#[tokio::test]
async fn test_empty_topic_is_rejected() {
    let (queue, _) = memory_queue();

    let err = queue.publish("", &chat("x")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = queue
        .subscribe("", ReplayPosition::FromLast, collect_into(&Inbox::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_disconnect_forgets_registrations() {
    let (queue, driver) = memory_queue();
    queue.connect().await.unwrap();
    assert!(queue.is_connected());
    queue
        .subscribe("Chat", ReplayPosition::FromLast, collect_into(&Inbox::default()))
        .await
        .unwrap();

    queue.disconnect().await.unwrap();

    assert!(!queue.is_connected());
    assert_eq!(queue.subscription_count(), 0);
    assert_eq!(driver.subscriber_count("Chat"), 0);
}

#[tokio::test]
async fn test_null_driver_facade_never_delivers() {
    let queue = MessageQueue::new(
        "disabled",
        Arc::new(NullMessageDriver::new()),
        JsonMessageSerializer::new(),
    );
    let inbox = Inbox::default();

    queue.connect().await.unwrap();
    queue.publish("Chat", &chat("hello")).await.unwrap();
    let handle = queue
        .subscribe("Chat", ReplayPosition::FromBeginning, collect_into(&inbox))
        .await
        .unwrap();
    queue.publish("Chat", &chat("world")).await.unwrap();
    queue.unsubscribe(&handle).await.unwrap();
    queue.disconnect().await.unwrap();

    settle().await;
    assert!(inbox.lock().unwrap().is_empty());
    assert_eq!(queue.driver().name(), "none");
}

#[tokio::test]
async fn test_serializer_swap_needs_no_driver_change() {
    let driver = Arc::new(InMemoryMessageDriver::new());
    let queue = MessageQueue::new("packed", driver.clone(), MsgPackMessageSerializer::new());
    let inbox = Inbox::default();

    queue.publish("Chat", &chat("packed")).await.unwrap();
    queue
        .subscribe("Chat", ReplayPosition::FromLast, collect_into(&inbox))
        .await
        .unwrap();

    assert_eq!(texts(&inbox), vec!["packed"]);
    assert_eq!(queue.serializer().content_type(), "application/msgpack");
    assert_eq!(driver.history_len("Chat"), 1);
}
