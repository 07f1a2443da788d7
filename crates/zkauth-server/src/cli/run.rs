use std::sync::Arc;
use tracing::info;
use zkauth_server::{load_verification_key, ApiServer, AuthService, AuthStorage, ServerConfig, StorageConfig};
use zkauth_types::{ZkAuthError, ZkAuthResult};

pub async fn run_server(config: ServerConfig) -> ZkAuthResult<()> {
    info!("Starting zkauth-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", config.data_dir);

    std::fs::create_dir_all(&config.data_dir)
        .map_err(|e| ZkAuthError::Config(format!("Failed to create data directory: {}", e)))?;

    let storage = Arc::new(AuthStorage::open(StorageConfig {
        path: config.storage_path(),
        ..Default::default()
    })?);

    let key = load_verification_key(&config.verification_key_path());
    let auth = AuthService::new(storage.clone(), key);

    ApiServer::new(config, auth).serve(wait_for_shutdown()).await?;

    info!("Shutting down...");
    storage.flush_async().await?;
    let metrics = storage.storage_metrics().snapshot();
    info!(
        reads = metrics.reads,
        writes = metrics.writes,
        conflicts = metrics.conflicts,
        errors = metrics.errors,
        uptime_secs = storage.uptime().as_secs(),
        "Storage closed"
    );

    info!("Shutdown complete");
    Ok(())
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => { info!("Received SIGTERM"); }
                    _ = tokio::signal::ctrl_c() => { info!("Received SIGINT"); }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl-C");
    }
}
