//! Message Queue Bootstrap
//!
//! Composition root: turns configuration into a ready [`MessageQueue`].
//!
//! ```text
//! MessageQueueConfig → MessageDriverFactory → Arc<dyn MessageDriver> ┐
//!                    → AnySerializer::from_kind ─────────────────────┴→ MessageQueue
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let queue = Arc::new(build_message_queue(&config.message_queue)?);
//! let lifecycle = QueueLifecycle::new(Arc::clone(&queue));
//! lifecycle.start().await?;
//! queue.publish(topics::CHAT, &message).await?;
//! lifecycle.run_until_signal().await?;
//! ```

use crate::config::MessageQueueConfig;
use crate::di::factory::MessageDriverFactory;
use mqb_application::MessageQueue;
use mqb_domain::error::Result;
use mqb_providers::serialization::AnySerializer;
use tracing::info;

/// Build an unconnected queue from configuration
pub fn build_message_queue(config: &MessageQueueConfig) -> Result<MessageQueue<AnySerializer>> {
    let driver = MessageDriverFactory::create(config)?;
    let serializer = AnySerializer::from_kind(config.serializer);

    info!(
        queue = %config.name,
        driver = %config.driver,
        serializer = %config.serializer,
        "Message queue built"
    );
    Ok(MessageQueue::new(config.name.clone(), driver, serializer))
}
