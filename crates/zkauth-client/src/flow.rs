use crate::api::AuthClient;
use crate::credentials::{CredentialRecord, CredentialStore};
use crate::nonce::generate_nonce;
use crate::task::ProofTask;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;
use zkauth_crypto::{derive_commitment, ProofProver};
use zkauth_types::{ZkAuthError, ZkAuthResult};

/// Registers `username` under a fresh nonce and records the result locally.
/// The secret never leaves this function.
pub async fn register_user(
    api: &AuthClient,
    store: &CredentialStore,
    username: &str,
    secret: &str,
) -> ZkAuthResult<CredentialRecord> {
    // Fail before the server holds a user whose nonce we could not keep
    store.path_for(username)?;
    if secret.is_empty() {
        return Err(ZkAuthError::Validation("secret must not be empty".into()));
    }

    let nonce = generate_nonce();
    let commitment = derive_commitment(secret, &nonce).to_canonical();
    api.register(username, &commitment, &nonce).await?;

    let record = CredentialRecord {
        username: username.to_string(),
        nonce,
        commitment,
        server: api.base_url().to_string(),
    };
    store.save(&record)?;

    info!(%username, "Registered");
    Ok(record)
}

/// Starts proving knowledge of `secret` for a stored record.
pub fn start_login_proof(
    prover: ProofProver,
    record: &CredentialRecord,
    secret: &str,
    api: &AuthClient,
) -> ProofTask {
    warn_on_server_mismatch(record, api);
    ProofTask::spawn(
        prover,
        secret.to_string(),
        record.nonce.clone(),
        record.commitment.clone(),
    )
}

/// Like [`start_login_proof`], but the proving key is read and checked on
/// the task's worker thread, so cancelling also covers the load.
pub fn start_login_proof_from_file(
    proving_key: PathBuf,
    record: &CredentialRecord,
    secret: &str,
    api: &AuthClient,
) -> ProofTask {
    warn_on_server_mismatch(record, api);
    let secret = Zeroizing::new(secret.to_string());
    let nonce = record.nonce.clone();
    let commitment = record.commitment.clone();
    ProofTask::spawn_with(move || {
        debug!("Loading proving key from {:?}", proving_key);
        ProofProver::from_file(&proving_key)?.prove(&secret, &nonce, &commitment)
    })
}

fn warn_on_server_mismatch(record: &CredentialRecord, api: &AuthClient) {
    if record.server != api.base_url() {
        warn!(
            "Credential for '{}' was registered with {}, logging in to {}",
            record.username,
            record.server,
            api.base_url()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_prover, save_fixture_proving_key, spawn_server};
    use std::time::Duration;
    use zkauth_types::ErrorKind;

    #[tokio::test]
    async fn test_register_then_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        let api = AuthClient::new(&spawn_server(true).await).unwrap();

        let record = register_user(&api, &store, "alice", "mysecret").await.unwrap();
        assert_eq!(store.load("alice").unwrap(), record);
        assert_eq!(record.commitment, derive_commitment("mysecret", &record.nonce).to_canonical());

        let bundle = start_login_proof(fixture_prover(), &record, "mysecret", &api)
            .wait_timeout(Duration::from_secs(120))
            .await
            .unwrap();
        let outcome = api.login("alice", &bundle).await.unwrap();
        assert_eq!(outcome.user.username, "alice");

        let bundle = start_login_proof(fixture_prover(), &record, "wrongsecret", &api)
            .wait()
            .await
            .unwrap();
        let err = api.login("alice", &bundle).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_failed_registration_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        let api = AuthClient::new(&spawn_server(true).await).unwrap();

        register_user(&api, &store, "alice", "mysecret").await.unwrap();
        std::fs::remove_file(store.path_for("alice").unwrap()).unwrap();

        let err = register_user(&api, &store, "alice", "other").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(store.load("alice").is_err());
    }

    #[tokio::test]
    async fn test_unstorable_username_never_reaches_server() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        let api = AuthClient::new(&spawn_server(true).await).unwrap();

        let first = register_user(&api, &store, ".alice", "mysecret").await.unwrap_err();
        assert_eq!(first.kind(), ErrorKind::Validation);

        // A retry would be a conflict if the server had stored the user
        let retry = register_user(&api, &store, ".alice", "mysecret").await.unwrap_err();
        assert_eq!(retry.kind(), ErrorKind::Validation);

        let record = register_user(&api, &store, "alice", "mysecret").await.unwrap();
        assert_eq!(store.load("alice").unwrap(), record);
    }

    #[tokio::test]
    async fn test_login_proof_loads_key_on_worker() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        let api = AuthClient::new(&spawn_server(true).await).unwrap();
        let record = register_user(&api, &store, "alice", "mysecret").await.unwrap();

        let pk_path = dir.path().join("auth.pk.bin");
        save_fixture_proving_key(&pk_path);
        let bundle = start_login_proof_from_file(pk_path, &record, "mysecret", &api)
            .wait()
            .await
            .unwrap();
        let outcome = api.login("alice", &bundle).await.unwrap();
        assert_eq!(outcome.user.username, "alice");

        let err = start_login_proof_from_file(dir.path().join("missing.bin"), &record, "mysecret", &api)
            .wait()
            .await
            .unwrap_err();
        assert!(matches!(err, ZkAuthError::ProofGeneration(_)));
    }

    #[tokio::test]
    async fn test_empty_secret_rejected_locally() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        let api = AuthClient::new("http://127.0.0.1:1").unwrap();

        let err = register_user(&api, &store, "alice", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
