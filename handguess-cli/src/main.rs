mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use handguess_core::HandGuessError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "handguess")]
#[command(about = "Double-or-nothing hand-guess simulator with play money")]
#[command(version)]
struct Cli {
    /// Path to the game config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive session
    Play(commands::PlayArgs),

    /// Run a fixed strategy headless and report the result
    Simulate(commands::SimulateArgs),

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(commands::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Keep logs quiet by default so they do not interleave with prompts
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "handguess={},handguess_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli_config = CliConfig::new(cli.config);

    let result = match cli.command {
        Commands::Play(args) => commands::run_play(args, &cli_config).await,
        Commands::Simulate(args) => commands::run_simulate(args, &cli_config).await,
        Commands::Config(cmd) => commands::handle_config_command(cmd, &cli_config).await,
    };

    if let Err(e) = result {
        match e {
            HandGuessError::Config(msg) => {
                eprintln!("Error: Invalid configuration: {}", msg);
                eprintln!(
                    "Check {} or run 'handguess config init --force'",
                    cli_config.path().display()
                );
            }
            HandGuessError::Serialization(err) => {
                eprintln!("Error: Could not parse config: {}", err);
                eprintln!("Config file: {}", cli_config.path().display());
            }
            HandGuessError::Dialog(msg) => {
                eprintln!("Error: Prompt failed: {}", msg);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
