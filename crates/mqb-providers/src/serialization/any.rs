//! Runtime-selected serializer
//!
//! `MessageSerializer` has generic methods and cannot be boxed, so the
//! configured encoding is picked through this enum instead.

use super::{JsonMessageSerializer, MsgPackMessageSerializer};
use mqb_domain::error::{Error, Result};
use mqb_domain::ports::MessageSerializer;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire encodings available from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializerKind {
    /// UTF-8 JSON
    #[default]
    Json,
    /// MessagePack
    #[serde(alias = "messagepack")]
    MsgPack,
}

impl FromStr for SerializerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "msgpack" | "messagepack" => Ok(Self::MsgPack),
            other => Err(Error::configuration(format!(
                "Unknown serializer '{other}' (expected json or msgpack)"
            ))),
        }
    }
}

impl fmt::Display for SerializerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::MsgPack => f.write_str("msgpack"),
        }
    }
}

/// Serializer chosen at runtime
#[derive(Debug, Clone, Copy)]
pub enum AnySerializer {
    /// JSON encoding
    Json(JsonMessageSerializer),
    /// MessagePack encoding
    MsgPack(MsgPackMessageSerializer),
}

impl AnySerializer {
    /// Build the serializer for a configured kind
    pub fn from_kind(kind: SerializerKind) -> Self {
        match kind {
            SerializerKind::Json => Self::Json(JsonMessageSerializer::new()),
            SerializerKind::MsgPack => Self::MsgPack(MsgPackMessageSerializer::new()),
        }
    }

    /// Kind this serializer was built from
    pub fn kind(&self) -> SerializerKind {
        match self {
            Self::Json(_) => SerializerKind::Json,
            Self::MsgPack(_) => SerializerKind::MsgPack,
        }
    }
}

impl Default for AnySerializer {
    fn default() -> Self {
        Self::from_kind(SerializerKind::default())
    }
}

impl MessageSerializer for AnySerializer {
    fn content_type(&self) -> &'static str {
        match self {
            Self::Json(inner) => inner.content_type(),
            Self::MsgPack(inner) => inner.content_type(),
        }
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        match self {
            Self::Json(inner) => inner.serialize(value),
            Self::MsgPack(inner) => inner.serialize(value),
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        match self {
            Self::Json(inner) => inner.deserialize(payload),
            Self::MsgPack(inner) => inner.deserialize(payload),
        }
    }
}
