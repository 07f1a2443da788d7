use super::commands::Cli;
use super::utils::init_logging;
use zkauth_server::{load_verification_key, AuthStorage, ServerConfig, StorageConfig};
use zkauth_types::ZkAuthResult;

/// `info` subcommand. Logging comes first so key-loading warnings are shown.
pub fn info_command(cli: &Cli, config: &ServerConfig) -> ZkAuthResult<()> {
    init_logging(cli, &config.logging)?;
    show_info(config)
}

pub fn show_info(config: &ServerConfig) -> ZkAuthResult<()> {
    let key_path = config.verification_key_path();
    println!("Data directory:    {:?}", config.data_dir);
    println!("API address:       http://{}", config.api.socket_addr());
    println!("Verification key:  {:?}", key_path);

    match load_verification_key(&key_path) {
        Some(key) => println!("Key fingerprint:   {}", key.fingerprint()),
        None => println!("Key fingerprint:   (not loaded, logins disabled)"),
    }

    let storage_path = config.storage_path();
    if storage_path.exists() {
        let storage = AuthStorage::open(StorageConfig {
            path: storage_path,
            ..Default::default()
        })?;
        let sizes = storage.tree_sizes();
        println!("Schema version:    {}", storage.schema_version()?);
        println!("Users:             {}", sizes.users);
        println!("Sessions:          {}", sizes.sessions);
    } else {
        println!("Storage:           (not created yet)");
    }
    Ok(())
}
