mod config;
mod metrics;
mod sessions;
mod traits;
mod types;
mod users;

pub use config::*;
pub use metrics::*;
pub use traits::{SessionStore, UserStore};
pub use types::*;

use sled::{Db, Tree};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use zkauth_types::{ZkAuthError, ZkAuthResult};

const CURRENT_SCHEMA_VERSION: u32 = 1;
const SCHEMA_KEY: &[u8] = b"__schema_version__";

/// sled-backed user and session store.
pub struct AuthStorage {
    db: Db,
    schema: Tree,
    users: Tree,
    sessions: Tree,
    storage_config: StorageConfig,
    metrics: Arc<StorageMetrics>,
    opened_at: Instant,
}

impl AuthStorage {
    pub fn open(config: StorageConfig) -> ZkAuthResult<Self> {
        info!("Opening storage at {:?}", config.path);

        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity_bytes)
            .flush_every_ms(config.flush_every_ms)
            .open()
            .map_err(|e| ZkAuthError::Storage(format!("Failed to open database: {}", e)))?;

        let storage = Self::create_from_db(db, config)?;
        storage.ensure_schema()?;

        info!("Storage opened (schema version {})", CURRENT_SCHEMA_VERSION);
        Ok(storage)
    }

    pub fn in_memory() -> ZkAuthResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| ZkAuthError::Storage(format!("Failed to open temp database: {}", e)))?;

        let config = StorageConfig {
            path: std::path::PathBuf::new(),
            ..Default::default()
        };

        let storage = Self::create_from_db(db, config)?;
        storage.ensure_schema()?;
        Ok(storage)
    }

    fn create_from_db(db: Db, config: StorageConfig) -> ZkAuthResult<Self> {
        let schema = Self::open_tree(&db, "schema")?;
        let users = Self::open_tree(&db, "users")?;
        let sessions = Self::open_tree(&db, "sessions")?;

        Ok(Self {
            db,
            schema,
            users,
            sessions,
            storage_config: config,
            metrics: Arc::new(StorageMetrics::new()),
            opened_at: Instant::now(),
        })
    }

    fn open_tree(db: &Db, name: &str) -> ZkAuthResult<Tree> {
        db.open_tree(name)
            .map_err(|e| ZkAuthError::Storage(format!("Failed to open {} tree: {}", name, e)))
    }

    fn ensure_schema(&self) -> ZkAuthResult<()> {
        match self.read_schema_info()? {
            None => self.initialize_schema(),
            Some(info) if info.version > CURRENT_SCHEMA_VERSION => Err(ZkAuthError::Storage(format!(
                "Database schema version {} is newer than supported {}",
                info.version, CURRENT_SCHEMA_VERSION
            ))),
            Some(_) => Ok(()),
        }
    }

    fn read_schema_info(&self) -> ZkAuthResult<Option<SchemaInfo>> {
        match self
            .schema
            .get(SCHEMA_KEY)
            .map_err(|e| ZkAuthError::Storage(format!("Failed to read schema: {}", e)))?
        {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|e| ZkAuthError::Storage(format!("Failed to deserialize schema: {}", e))),
            None => Ok(None),
        }
    }

    fn write_schema_info(&self, info: &SchemaInfo) -> ZkAuthResult<()> {
        let bytes = bincode::serialize(info)
            .map_err(|e| ZkAuthError::Storage(format!("Failed to serialize schema: {}", e)))?;
        self.schema
            .insert(SCHEMA_KEY, bytes)
            .map_err(|e| ZkAuthError::Storage(format!("Failed to store schema: {}", e)))?;
        Ok(())
    }

    fn initialize_schema(&self) -> ZkAuthResult<()> {
        info!("Initializing new database with schema version {}", CURRENT_SCHEMA_VERSION);
        self.write_schema_info(&SchemaInfo {
            version: CURRENT_SCHEMA_VERSION,
            created_at: chrono::Utc::now().timestamp(),
        })?;
        self.flush()
    }

    pub fn schema_version(&self) -> ZkAuthResult<u32> {
        Ok(self.read_schema_info()?.map(|info| info.version).unwrap_or(0))
    }

    pub fn flush(&self) -> ZkAuthResult<()> {
        self.metrics.flushes.fetch_add(1, Ordering::Relaxed);
        self.db
            .flush()
            .map_err(|e| ZkAuthError::Storage(format!("Flush error: {}", e)))?;
        Ok(())
    }

    pub async fn flush_async(&self) -> ZkAuthResult<()> {
        self.metrics.flushes.fetch_add(1, Ordering::Relaxed);
        self.db
            .flush_async()
            .await
            .map_err(|e| ZkAuthError::Storage(format!("Flush error: {}", e)))?;
        Ok(())
    }

    pub fn tree_sizes(&self) -> TreeSizes {
        TreeSizes {
            users: self.users.len(),
            sessions: self.sessions.len(),
        }
    }

    pub fn storage_metrics(&self) -> Arc<StorageMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.opened_at.elapsed()
    }

    pub fn is_in_memory(&self) -> bool {
        self.storage_config.path.as_os_str().is_empty()
    }

    fn storage_error(&self, context: &str, e: impl std::fmt::Display) -> ZkAuthError {
        self.metrics.errors.fetch_add(1, Ordering::Relaxed);
        ZkAuthError::Storage(format!("{}: {}", context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_schema() {
        let storage = AuthStorage::in_memory().unwrap();
        assert!(storage.is_in_memory());
        assert_eq!(storage.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            path: dir.path().join("db"),
            ..Default::default()
        };

        {
            let storage = AuthStorage::open(config.clone()).unwrap();
            assert!(!storage.is_in_memory());
            storage.flush().unwrap();
        }

        let storage = AuthStorage::open(config).unwrap();
        assert_eq!(storage.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_uptime_advances() {
        let storage = AuthStorage::in_memory().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(storage.uptime() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn test_newer_schema_rejected() {
        let storage = AuthStorage::in_memory().unwrap();
        storage
            .write_schema_info(&SchemaInfo {
                version: CURRENT_SCHEMA_VERSION + 1,
                created_at: 0,
            })
            .unwrap();
        assert!(storage.ensure_schema().is_err());
    }
}
