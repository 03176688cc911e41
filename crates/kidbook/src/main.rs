//! Kidbook command-line tool.

use clap::Parser;
use kidbook::cli::{Cli, Commands, handle_inspect_command, handle_run_command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    kidbook::init_tracing("info");

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => handle_run_command(args).await?,
        Commands::Inspect { package } => handle_inspect_command(&package)?,
    }

    Ok(())
}
