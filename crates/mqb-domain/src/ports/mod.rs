//! Domain Port Interfaces
//!
//! Contracts the transports and encodings implement. Implementations live in
//! `mqb-providers`.

/// Transport driver port
pub mod driver;
/// Payload serializer port
pub mod serializer;

pub use driver::{MessageDriver, RawHandler, raw_handler};
pub use serializer::MessageSerializer;
