#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod api;
pub mod credentials;
pub mod flow;
pub mod nonce;
pub mod task;

pub use api::{AuthClient, IssuedSession, LoggedInUser, LoginOutcome, ServerHealth, DEFAULT_SERVER_URL};
pub use credentials::{default_client_dir, CredentialRecord, CredentialStore};
pub use flow::{register_user, start_login_proof, start_login_proof_from_file};
pub use nonce::generate_nonce;
pub use task::{CancellationToken, Canceller, ProofTask};

#[cfg(test)]
pub(crate) mod testing {
    use std::net::SocketAddr;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use std::sync::{Arc, OnceLock};
    use zkauth_crypto::{derive_commitment, setup_auth_keys, ProofProver, ProvingArtifacts, VerificationKey};
    use zkauth_server::{ApiServer, AuthService, AuthStorage, ServerConfig};

    pub const TEST_SECRET: &str = "mysecret";
    pub const TEST_NONCE: &str = "n-001";

    const FIXTURE_SEED: u64 = 0x7a6b_6175_7468;

    static KEYS: OnceLock<(Arc<ProvingArtifacts>, Arc<VerificationKey>)> = OnceLock::new();

    fn keys() -> &'static (Arc<ProvingArtifacts>, Arc<VerificationKey>) {
        KEYS.get_or_init(|| {
            let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
            let (pk, vk) = setup_auth_keys(&mut rng).unwrap();
            let key = VerificationKey::from_verifying_key(&vk).unwrap();
            (Arc::new(ProvingArtifacts::new(pk)), Arc::new(key))
        })
    }

    pub fn save_fixture_proving_key(path: &std::path::Path) {
        keys().0.save(path).unwrap();
    }

    pub fn fixture_prover() -> ProofProver {
        ProofProver::new(keys().0.clone())
    }

    pub fn test_commitment() -> String {
        derive_commitment(TEST_SECRET, TEST_NONCE).to_canonical()
    }

    /// Serves a fresh in-memory server on an ephemeral port.
    pub async fn spawn_server(with_key: bool) -> String {
        let storage = Arc::new(AuthStorage::in_memory().unwrap());
        let key = with_key.then(|| keys().1.clone());
        let router = ApiServer::new(ServerConfig::default(), AuthService::new(storage, key)).router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });
        format!("http://{}", addr)
    }
}
