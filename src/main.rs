//! # flowgraph
//!
//! Command-line front end for the flow graph engine. Reads graphs, ops and
//! breadcrumbs as JSON files and prints results to stdout; logs go to
//! stderr.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use flowgraph::cli::Cli;
use flowgraph::commands;
use flowgraph::config::FlowgraphConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = FlowgraphConfig::discover(cli.config.as_deref())
        .context("Failed to load flowgraph config")?;

    init_tracing(config.log_filter.as_deref());

    let output = commands::execute(&cli, &config)?;
    println!("{output}");
    Ok(())
}

/// `RUST_LOG` wins, then the config's `log_filter`, then `info`.
fn init_tracing(fallback: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
