//! Binary entrypoint for the backlog refinement agent.
use clap::Parser;
use tracing_subscriber::EnvFilter;

use refine_agent::{run, Cli};

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let summary = run(&cli)?;
    tracing::debug!("Run summary: {}", serde_json::to_string(&summary)?);

    if summary.tracker_failures > 0 || !summary.chat_posted {
        tracing::warn!(
            tracker_failures = summary.tracker_failures,
            chat_posted = summary.chat_posted,
            "Some reports were not delivered"
        );
    }
    Ok(())
}
