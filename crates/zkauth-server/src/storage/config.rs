use std::path::PathBuf;

const FLUSH_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub cache_capacity_bytes: u64,
    pub flush_every_ms: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("db"),
            cache_capacity_bytes: 32 * 1024 * 1024,
            flush_every_ms: Some(FLUSH_INTERVAL_MS),
        }
    }
}
