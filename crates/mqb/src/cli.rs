//! Command line interface
//!
//! Thin operator tool over the configured message queue. Payloads are
//! handled as JSON values whatever serializer the queue is configured with.

use clap::{Parser, Subcommand};
use mqb_domain::error::{Error, Result};
use mqb_domain::topics;
use mqb_domain::value_objects::{ReplayKind, ReplayPosition};
use mqb_infrastructure::{ConfigLoader, QueueLifecycle, build_message_queue, init_logging};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Command line interface for the message bus
#[derive(Parser, Debug)]
#[command(name = "mqb")]
#[command(about = "mqb - publish/subscribe message bus")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the well-known topic names
    Topics,

    /// Connect, publish one JSON value, disconnect
    Publish {
        /// Topic name (case-sensitive)
        topic: String,
        /// JSON document to publish
        payload: String,
    },

    /// Subscribe and print every message until ctrl-c
    Listen {
        /// Topics to subscribe to
        #[arg(required = true)]
        topics: Vec<String>,

        /// Retained messages to receive first
        #[arg(short, long, default_value_t = ReplayKind::FromLast)]
        replay: ReplayKind,

        /// Count for `from-last-n`, start index for `from-index`
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

impl Command {
    /// Replay position selected by a `listen` command
    pub fn replay_position(&self) -> Option<ReplayPosition> {
        match self {
            Self::Listen { replay, count, .. } => Some(ReplayPosition::from_parts(*replay, *count)),
            Self::Topics | Self::Publish { .. } => None,
        }
    }
}

/// Execute a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    if cli.command == Command::Topics {
        for name in topics::ALL {
            println!("{name}");
        }
        return Ok(());
    }

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    // The level was validated by the loader, so failure means a subscriber
    // is already installed and keeps receiving our events
    if let Err(e) = init_logging(config.logging.clone()) {
        debug!(error = %e, "Keeping the installed tracing subscriber");
    }

    let queue = Arc::new(build_message_queue(&config.message_queue)?);
    let lifecycle = QueueLifecycle::new(Arc::clone(&queue));
    let position = cli.command.replay_position();

    match cli.command {
        Command::Topics => Ok(()),
        Command::Publish { topic, payload } => {
            let value: serde_json::Value = serde_json::from_str(&payload)?;
            lifecycle.start().await?;
            let published = queue.publish(&topic, &value).await;
            lifecycle.shutdown().await?;
            published?;
            info!(topic = %topic, "Message published");
            Ok(())
        }
        Command::Listen { topics, .. } => {
            let replay = position.unwrap_or_default();
            lifecycle.start().await?;
            for topic in topics {
                let label = topic.clone();
                queue
                    .subscribe(&topic, replay, move |value: serde_json::Value| {
                        println!("{label}\t{value}");
                        async { Ok::<(), Error>(()) }
                    })
                    .await?;
            }
            info!(driver = queue.driver().name(), %replay, "Listening, press ctrl-c to stop");
            lifecycle.run_until_signal().await
        }
    }
}
