//! Payload Serializers
//!
//! | Serializer | Content type |
//! |------------|--------------|
//! | [`JsonMessageSerializer`] | `application/json` |
//! | [`MsgPackMessageSerializer`] | `application/msgpack` |
//! | [`AnySerializer`] | whichever [`SerializerKind`] configuration selects |

pub mod any;
pub mod json;
pub mod msgpack;

pub use any::{AnySerializer, SerializerKind};
pub use json::JsonMessageSerializer;
pub use msgpack::MsgPackMessageSerializer;
