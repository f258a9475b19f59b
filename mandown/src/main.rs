//! ManDown Entry Point

use clap::Parser;
use mandown::cli::{self, Cli, Commands};
use mandown::config::Settings;
use mandown::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env は任意
    let _ = dotenvy::dotenv();
    let _log_guard = logging::init()?;

    let cli = Cli::parse();
    let settings = Settings::load()?;

    match cli.command {
        Some(Commands::Serve(args)) => cli::serve::execute(&args, settings).await,
        Some(Commands::Poll) => cli::poll::execute(settings).await,
        Some(Commands::Check(args)) => cli::check::execute(&args, settings).await,
        None => cli::serve::execute(&cli::serve::ServeArgs::default(), settings).await,
    }
}
