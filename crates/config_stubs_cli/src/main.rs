use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config_stubs_cli::commands::{
    build_cmd::{self, BuildArgs},
    config_cmd::{self, ConfigCommands},
    list_cmd::{self, ListArgs},
};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// config-stubs: add per-branch and per-tag configuration stubs to a documentation site
#[derive(Parser)]
#[command(name = "config-stubs")]
#[command(about = "Add configuration stubs from Git branches and tags to a documentation site", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the stubs and write them to the output directory
    Build(BuildArgs),

    /// Show the stubs a build would include
    List(ListArgs),

    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show the CLI version
    Version,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("CONFIG_STUBS_LOG"))
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Build(args) => build_cmd::execute(args).await,
        Commands::List(args) => list_cmd::execute(args).await,
        Commands::Config(cmd) => config_cmd::execute(cmd).await,
        Commands::Version => {
            println!("config-stubs version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
