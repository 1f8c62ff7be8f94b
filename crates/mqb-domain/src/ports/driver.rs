//! Message Driver Port
//!
//! Defines the contract every transport implements. Drivers move opaque byte
//! payloads on named topics and never look inside them; typing happens one
//! layer up in the facade.
//!
//! ## Usage
//!
//! ```no_run
//! use bytes::Bytes;
//! use mqb_domain::ports::{MessageDriver, raw_handler};
//! use mqb_domain::value_objects::{ReplayPosition, Topic};
//! use std::sync::Arc;
//!
//! async fn echo(driver: Arc<dyn MessageDriver>) -> mqb_domain::Result<()> {
//!     let topic = Topic::new("Chat")?;
//!     let id = driver
//!         .subscribe(
//!             &topic,
//!             raw_handler(|payload: Bytes| async move {
//!                 println!("{} bytes", payload.len());
//!                 Ok::<(), mqb_domain::Error>(())
//!             }),
//!             ReplayPosition::FromLast,
//!         )
//!         .await?;
//!     driver.publish(&topic, Bytes::from_static(b"hello")).await?;
//!     driver.unsubscribe(&topic, id).await
//! }
//! ```

use crate::error::Result;
use crate::value_objects::{ReplayPosition, SubscriptionId, Topic};
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Byte-level callback a driver invokes when a message arrives
///
/// Errors returned here are logged by the driver and never stop delivery to
/// other handlers or of later messages.
pub type RawHandler = Arc<dyn Fn(Bytes) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Wrap an async closure as a [`RawHandler`]
pub fn raw_handler<F, Fut>(f: F) -> RawHandler
where
    F: Fn(Bytes) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |payload: Bytes| -> BoxFuture<'static, Result<()>> { Box::pin(f(payload)) })
}

/// Transport driver interface
///
/// Concrete drivers are independent strategies selected at construction time.
/// All operations may suspend; none of them retries on its own.
///
/// | Method | Purpose |
/// |--------|---------|
/// | `connect` / `disconnect` | Acquire and release the transport |
/// | `publish` | Hand raw bytes to the transport |
/// | `subscribe` | Register a raw handler, replaying history where supported |
/// | `unsubscribe` | Remove exactly the registration `subscribe` returned |
#[async_trait]
pub trait MessageDriver: Send + Sync {
    /// Human-readable driver name used in logs and errors
    fn name(&self) -> &str;

    /// Whether the transport connection is currently established
    fn is_connected(&self) -> bool;

    /// Whether this driver retains history that `ReplayPosition` can select from
    fn supports_replay(&self) -> bool {
        false
    }

    /// Establish the transport connection
    async fn connect(&self) -> Result<()>;

    /// Release every resource the driver holds
    ///
    /// Registrations are discarded, not restored on a later `connect`.
    /// Calling this while already disconnected succeeds.
    async fn disconnect(&self) -> Result<()>;

    /// Publish a payload; a topic without subscribers is not an error
    async fn publish(&self, topic: &Topic, payload: Bytes) -> Result<()>;

    /// Register `handler` for `topic` and replay history per `replay`
    async fn subscribe(
        &self,
        topic: &Topic,
        handler: RawHandler,
        replay: ReplayPosition,
    ) -> Result<SubscriptionId>;

    /// Remove a registration; unknown ids are a no-op
    async fn unsubscribe(&self, topic: &Topic, id: SubscriptionId) -> Result<()>;
}
