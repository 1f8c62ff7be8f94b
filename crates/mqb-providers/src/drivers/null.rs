//! Null Message Driver
//!
//! Used when messaging is disabled. Every operation succeeds and no handler
//! is ever invoked, so callers never need to check whether a bus exists.
//!
//! ## Usage
//!
//! ```rust
//! use mqb_providers::drivers::NullMessageDriver;
//!
//! let driver = NullMessageDriver::new();
//! // Publishes are silently discarded
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use mqb_domain::error::Result;
use mqb_domain::ports::{MessageDriver, RawHandler};
use mqb_domain::value_objects::{ReplayPosition, SubscriptionId, Topic};
use std::sync::Arc;

/// Null driver for disabled messaging and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMessageDriver;

impl NullMessageDriver {
    /// Create a new null driver
    pub fn new() -> Self {
        Self
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl MessageDriver for NullMessageDriver {
    fn name(&self) -> &str {
        "none"
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    async fn publish(&self, _topic: &Topic, _payload: Bytes) -> Result<()> {
        Ok(())
    }

    async fn subscribe(
        &self,
        _topic: &Topic,
        _handler: RawHandler,
        _replay: ReplayPosition,
    ) -> Result<SubscriptionId> {
        // Handler is dropped; nothing will ever call it
        Ok(SubscriptionId::new())
    }

    async fn unsubscribe(&self, _topic: &Topic, _id: SubscriptionId) -> Result<()> {
        Ok(())
    }
}
