use super::commands::ConfigAction;
use std::path::Path;
use zkauth_server::ServerConfig;
use zkauth_types::{ZkAuthError, ZkAuthResult};

pub fn handle_config(config_path: &Path, action: Option<&ConfigAction>) -> ZkAuthResult<()> {
    if !config_path.exists() {
        println!("No configuration file found at {:?}", config_path);
        println!("Run 'zkauth-server init' to create one");
        return Ok(());
    }

    match action {
        Some(ConfigAction::Show) | None => {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| ZkAuthError::Config(format!("Failed to read config: {}", e)))?;
            println!("{}", content);
        }
        Some(ConfigAction::Validate) => match ServerConfig::load(config_path) {
            Ok(_) => println!("[+] Configuration is valid"),
            Err(e) => println!("[-] Configuration error: {}", e),
        },
    }
    Ok(())
}
