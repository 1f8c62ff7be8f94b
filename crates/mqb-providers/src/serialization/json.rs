//! JSON Serializer
//!
//! UTF-8 JSON encoding through `serde_json`. This is the reference wire
//! encoding and the default.

use mqb_domain::error::{Error, Result};
use mqb_domain::ports::MessageSerializer;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// JSON payload serializer
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMessageSerializer;

impl JsonMessageSerializer {
    /// Create a new JSON serializer
    pub fn new() -> Self {
        Self
    }
}

impl MessageSerializer for JsonMessageSerializer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| Error::serialization_with_source("Failed to encode JSON payload", e))
    }

    fn deserialize<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        serde_json::from_slice(payload)
            .map_err(|e| Error::serialization_with_source("Failed to decode JSON payload", e))
    }
}
