use std::path::Path;
use zkauth_server::ServerConfig;
use zkauth_types::{ZkAuthError, ZkAuthResult};

pub fn init_config(config_path: &Path, data_dir: &Path, force: bool) -> ZkAuthResult<()> {
    if config_path.exists() && !force {
        return Err(ZkAuthError::Config(format!(
            "Configuration already exists at {:?} (use --force to overwrite)",
            config_path
        )));
    }

    std::fs::create_dir_all(data_dir)
        .map_err(|e| ZkAuthError::Config(format!("Failed to create data directory: {}", e)))?;

    let config = ServerConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    config.save(config_path)?;

    println!("[+] Configuration written to {:?}", config_path);
    println!("[+] Place the verification key at {:?}", config.verification_key_path());
    println!("    (generate one with: zk-keygen generate --output {:?})", data_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let data_dir = dir.path().join("data");

        init_config(&config_path, &data_dir, false).unwrap();
        let contents = std::fs::read_to_string(&config_path).unwrap();
        let config: ServerConfig = toml::from_str(&contents).unwrap();
        assert_eq!(config.data_dir, data_dir);
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        assert!(init_config(&config_path, dir.path(), false).is_err());
        assert!(init_config(&config_path, dir.path(), true).is_ok());
    }
}
