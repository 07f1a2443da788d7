mod cli;

use clap::Parser;
use cli::{handle_config, info_command, init_config, init_logging, run_server, Cli, Commands};
use std::path::Path;
use zkauth_server::{default_data_dir, ServerConfig, CONFIG_FILE_NAME};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE_NAME));

    match &cli.command {
        Commands::Init { force } => {
            init_config(&config_path, &data_dir, *force)?;
        }
        Commands::Config { action } => {
            handle_config(&config_path, action.as_ref())?;
        }
        Commands::Run => {
            let config = load_config(&cli, &config_path)?;
            init_logging(&cli, &config.logging)?;
            run_server(config).await?;
        }
        Commands::Info => {
            let config = load_config(&cli, &config_path)?;
            info_command(&cli, &config)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli, config_path: &Path) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load(config_path)?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}
