//! Metacat CLI
//!
//! Serves and provisions the catalogue search service.

use anyhow::Result;
use clap::Parser;
use metacat_cli::{Cli, commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,metacat=debug".into()),
        )
        .init();

    commands::run(cli.config.as_deref(), cli.command).await?;
    Ok(())
}
