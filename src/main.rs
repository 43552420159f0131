//! CLI entry point for building a photo mosaic and its tile pyramid

use clap::Parser;
use mosaicmap::io::cli::{Cli, MosaicRunner};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> mosaicmap::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    MosaicRunner::new(cli).run().map(|_| ())
}
