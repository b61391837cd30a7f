use crate::config::CliConfig;
use clap::Subcommand;
use dialoguer::Confirm;
use handguess_core::{GameConfig, Result};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective game configuration
    Show,
    /// Write the default configuration to the config path
    Init {
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_config_command(cmd: ConfigCommands, cli_config: &CliConfig) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = cli_config.game_config()?;
            let source = if cli_config.path().exists() {
                cli_config.path().display().to_string()
            } else {
                "built-in defaults".to_string()
            };

            println!("Configuration ({}):", source);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        ConfigCommands::Init { force } => {
            let path = cli_config.path();

            if path.exists() && !force {
                let confirm = Confirm::new()
                    .with_prompt(format!("{} already exists. Overwrite it?", path.display()))
                    .default(false)
                    .interact()?;

                if !confirm {
                    println!("Config left unchanged.");
                    return Ok(());
                }
            }

            GameConfig::default().save(path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
