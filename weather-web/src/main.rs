//! Binary crate for the `weather-web` server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Routing, request handling and HTML rendering

use clap::Parser;

mod cli;
mod handlers;
mod server;
mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_web=info,weather_core=info".into()),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
