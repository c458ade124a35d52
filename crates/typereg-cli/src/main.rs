//! typereg - object-type registry inspector.
//!
//! Loads type definitions into an in-memory repository and prints children,
//! descendant trees, or single definitions as JSON.

mod commands;
mod config;
mod error;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Args;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typereg=info,typereg_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    tracing::debug!(repository = %args.repository, command = ?args.command, "running");

    let value = match commands::run(&args) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            return Err(e.into());
        }
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{output}");
    Ok(())
}
