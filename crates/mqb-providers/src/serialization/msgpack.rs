//! MessagePack Serializer
//!
//! Compact binary encoding through `rmp-serde`. Structs are written as maps
//! with field names, so payloads survive field reordering.

use mqb_domain::error::{Error, Result};
use mqb_domain::ports::MessageSerializer;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// MessagePack payload serializer
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackMessageSerializer;

impl MsgPackMessageSerializer {
    /// Create a new MessagePack serializer
    pub fn new() -> Self {
        Self
    }
}

impl MessageSerializer for MsgPackMessageSerializer {
    fn content_type(&self) -> &'static str {
        "application/msgpack"
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(value)
            .map_err(|e| Error::serialization_with_source("Failed to encode MessagePack payload", e))
    }

    fn deserialize<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        rmp_serde::from_slice(payload)
            .map_err(|e| Error::serialization_with_source("Failed to decode MessagePack payload", e))
    }
}
