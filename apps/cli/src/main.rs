//! stagedoor CLI — browse a theater's actors, characters, and plays.
//!
//! Loads entity data from the theater REST API or from static CSV files
//! and renders list and detail views in the terminal.

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
