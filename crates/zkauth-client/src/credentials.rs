//! Per-user registration records kept on the client.
//!
//! A record holds everything needed to log in again except the secret.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use zkauth_types::{validate_username, ZkAuthError, ZkAuthResult};

const CREDENTIALS_DIR: &str = "credentials";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub nonce: String,
    pub commitment: String,
    pub server: String,
}

pub fn default_client_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".zkauth-client"))
        .unwrap_or_else(|| PathBuf::from(".zkauth-client"))
}

pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(client_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: client_dir.as_ref().join(CREDENTIALS_DIR),
        }
    }

    pub fn path_for(&self, username: &str) -> ZkAuthResult<PathBuf> {
        validate_username(username)?;
        if username.contains(['/', '\\']) || username.starts_with('.') {
            return Err(ZkAuthError::Validation(format!(
                "username '{}' cannot be used as a file name",
                username
            )));
        }
        Ok(self.dir.join(format!("{}.json", username)))
    }

    pub fn save(&self, record: &CredentialRecord) -> ZkAuthResult<PathBuf> {
        let path = self.path_for(&record.username)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ZkAuthError::Config(format!("Failed to create credentials dir: {}", e)))?;

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ZkAuthError::Serialization(e.to_string()))?;
        std::fs::write(&path, json)
            .map_err(|e| ZkAuthError::Config(format!("Failed to write {:?}: {}", path, e)))?;

        debug!("Saved credential record to {:?}", path);
        Ok(path)
    }

    pub fn load(&self, username: &str) -> ZkAuthResult<CredentialRecord> {
        let path = self.path_for(username)?;
        if !path.exists() {
            return Err(ZkAuthError::NotFound(format!(
                "no credential record for '{}' (register first)",
                username
            )));
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| ZkAuthError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ZkAuthError::Serialization(format!("Invalid credential record: {}", e)))
    }
}
