//! mqb - Entry Point
//!
//! Binary entry point for the message bus command line tool.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mqb topics` | Print the topic catalog |
//! | `mqb publish <topic> <json>` | Publish one JSON value |
//! | `mqb listen <topic>...` | Print messages until ctrl-c |

use clap::Parser;
use mqb::cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}
