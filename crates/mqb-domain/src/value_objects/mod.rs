//! Domain Value Objects
//!
//! Immutable values created per call and compared by their attributes.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Topic`] | Validated topic name |
//! | [`ReplayPosition`] | Historical replay policy chosen at subscribe time |
//! | [`SubscriptionId`] | Opaque registration token used for unsubscribe |

/// Replay policy value objects
pub mod replay;
/// Subscription identity
pub mod subscription;
/// Topic name value object
pub mod topic;

pub use replay::{ReplayKind, ReplayPosition};
pub use subscription::SubscriptionId;
pub use topic::Topic;
