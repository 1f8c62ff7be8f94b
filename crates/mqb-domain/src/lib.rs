//! # mqb Domain Layer
//!
//! Core vocabulary of the message bus: what a topic is, how replay is chosen,
//! how subscriptions are identified, and the ports transports and serializers
//! implement.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error type and `Result` alias |
//! | [`topics`] | Well-known topic catalog |
//! | [`value_objects`] | `Topic`, `ReplayPosition`, `SubscriptionId` |
//! | [`ports`] | `MessageDriver` and `MessageSerializer` traits |
//! | [`constants`] | Shared defaults |

pub mod constants;
pub mod error;
pub mod ports;
pub mod topics;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{MessageDriver, MessageSerializer, RawHandler, raw_handler};
pub use value_objects::{ReplayKind, ReplayPosition, SubscriptionId, Topic};
