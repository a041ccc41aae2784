mod cli;
mod commands;
mod logging;
mod paths;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;
use crate::cli::Commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.keep_logs);

    log::info!("Starting smart-tables");
    match cli.command {
        Commands::Render(args) => commands::render(args).await,
        Commands::Columns(args) => commands::columns(args),
    }
}
