//! Message Serializer Port
//!
//! Converts typed payloads to and from the opaque bytes drivers carry.
//! Implementations are pure and stateless, so swapping one never touches
//! driver code.

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serializer interface used as a generic parameter of the facade
///
/// The methods are generic, which keeps the trait out of `dyn` position;
/// runtime selection goes through an enum implementing it instead.
pub trait MessageSerializer: Send + Sync + 'static {
    /// MIME-style name of the encoding, for logs and diagnostics
    fn content_type(&self) -> &'static str;

    /// Encode a value into a payload
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode a payload into a value
    fn deserialize<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T>;
}
