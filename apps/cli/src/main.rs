//! EndorseTrack CLI: bulk endorsement-list import tool.
//!
//! Converts hand-authored endorsement-list markup into structured,
//! citation-backed records resolved against a registry of known endorsers.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
