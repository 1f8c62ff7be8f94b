//! Serializer Tests

use mqb_domain::error::Error;
use mqb_domain::ports::MessageSerializer;
use mqb_providers::serialization::{
    AnySerializer, JsonMessageSerializer, MsgPackMessageSerializer, SerializerKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChatMessage {
    from: String,
    body: String,
    sent_at: u64,
    attachments: Vec<String>,
}

fn sample() -> ChatMessage {
    ChatMessage {
        from: "alice".to_string(),
        body: "héllo wörld".to_string(),
        sent_at: 1_700_000_000,
        attachments: vec!["a.png".to_string()],
    }
}

#[test]
fn test_json_payload_is_utf8_json() {
    let serializer = JsonMessageSerializer::new();
    let bytes = serializer.serialize(&sample()).unwrap();

    let text = std::str::from_utf8(&bytes).unwrap();
    assert!(text.starts_with('{'));
    assert!(text.contains("\"from\":\"alice\""));
    assert_eq!(serializer.deserialize::<ChatMessage>(&bytes).unwrap(), sample());
}

#[test]
fn test_msgpack_round_trip() {
    let serializer = MsgPackMessageSerializer::new();
    let bytes = serializer.serialize(&sample()).unwrap();
    assert_eq!(serializer.deserialize::<ChatMessage>(&bytes).unwrap(), sample());
}

#[test]
fn test_decode_failure_is_serialization_error() {
    let json = JsonMessageSerializer::new();
    let err = json.deserialize::<ChatMessage>(b"not json").unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));

    let msgpack = MsgPackMessageSerializer::new();
    let err = msgpack.deserialize::<ChatMessage>(&[0xc1]).unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
}

#[test]
fn test_encodings_are_not_interchangeable() {
    let bytes = MsgPackMessageSerializer::new().serialize(&sample()).unwrap();
    assert!(JsonMessageSerializer::new().deserialize::<ChatMessage>(&bytes).is_err());
}

#[test]
fn test_any_serializer_delegates_to_kind() {
    let json = AnySerializer::from_kind(SerializerKind::Json);
    let msgpack = AnySerializer::from_kind(SerializerKind::MsgPack);

    assert_eq!(json.content_type(), "application/json");
    assert_eq!(msgpack.content_type(), "application/msgpack");
    assert_eq!(msgpack.kind(), SerializerKind::MsgPack);
    assert_eq!(AnySerializer::default().kind(), SerializerKind::Json);

    let bytes = msgpack.serialize(&sample()).unwrap();
    assert_eq!(
        MsgPackMessageSerializer::new()
            .deserialize::<ChatMessage>(&bytes)
            .unwrap(),
        sample()
    );
}

#[test]
fn test_serializer_kind_parsing() {
    assert_eq!("json".parse::<SerializerKind>().unwrap(), SerializerKind::Json);
    assert_eq!(" MsgPack ".parse::<SerializerKind>().unwrap(), SerializerKind::MsgPack);
    assert_eq!(
        "messagepack".parse::<SerializerKind>().unwrap(),
        SerializerKind::MsgPack
    );
    assert!(matches!(
        "xml".parse::<SerializerKind>(),
        Err(Error::Configuration { .. })
    ));
    assert_eq!(SerializerKind::MsgPack.to_string(), "msgpack");
}

#[test]
fn test_serializer_kind_serde_names() {
    assert_eq!(serde_json::to_string(&SerializerKind::MsgPack).unwrap(), "\"msgpack\"");
    assert_eq!(
        serde_json::from_str::<SerializerKind>("\"json\"").unwrap(),
        SerializerKind::Json
    );
}
