use super::api::ApiConfig;
use super::logging::LoggingConfig;
use super::rate_limit::RateLimitConfig;
use super::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zkauth_crypto::VERIFICATION_KEY_FILE;
use zkauth_types::{ZkAuthError, ZkAuthResult};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/verification_key.json` when unset.
    pub verification_key_path: Option<PathBuf>,
    pub api: ApiConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".zkauth"))
        .unwrap_or_else(|| PathBuf::from("/var/lib/zkauth"))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            verification_key_path: None,
            api: ApiConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `path` if it exists, then applies environment overrides and
    /// validates. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> ZkAuthResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| ZkAuthError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| ZkAuthError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ZkAuthResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ZkAuthError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ZkAuthError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| ZkAuthError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("ZKAUTH_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(port) = lookup("ZKAUTH_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => warn!("Ignoring invalid ZKAUTH_API_PORT: {}", port),
            }
        }

        if let Some(bind) = lookup("ZKAUTH_API_BIND") {
            if let Ok(addr) = bind.parse() {
                self.api.bind_address = addr;
                if bind != "127.0.0.1" && bind != "::1" {
                    warn!(
                        "API server binding to non-localhost address: {}. Ensure proper firewall rules.",
                        bind
                    );
                }
            }
        }

        if let Some(path) = lookup("ZKAUTH_VERIFICATION_KEY") {
            self.verification_key_path = Some(PathBuf::from(path));
        }

        if let Some(level) = lookup("ZKAUTH_LOG_LEVEL") {
            self.logging.level = LogLevel::parse_lossy(&level);
        }

        if lookup("ZKAUTH_LOG_JSON").is_some() {
            self.logging.json = true;
        }
    }

    pub fn validate(&self) -> ZkAuthResult<()> {
        if self.api.port == 0 {
            return Err(ZkAuthError::Config("API port cannot be 0".into()));
        }

        if self.rate_limit.enabled
            && (self.rate_limit.requests_per_second == 0 || self.rate_limit.burst_size == 0)
        {
            return Err(ZkAuthError::Config(
                "Rate limit requests_per_second and burst_size must be greater than 0".into(),
            ));
        }

        if let Some(ref path) = self.verification_key_path {
            if path.as_os_str().is_empty() {
                return Err(ZkAuthError::Config(
                    "verification_key_path cannot be empty".into(),
                ));
            }
        }

        if self.api.max_body_size == 0 {
            return Err(ZkAuthError::Config("API max_body_size cannot be 0".into()));
        }

        Ok(())
    }

    pub fn verification_key_path(&self) -> PathBuf {
        self.verification_key_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(VERIFICATION_KEY_FILE))
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("db")
    }

    pub fn api_is_localhost_only(&self) -> bool {
        self.api.bind_address.is_loopback()
    }
}
