#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod api;
pub mod auth;
pub mod config;
pub mod storage;

pub use api::{ApiError, ApiRateLimiter, ApiServer, AppState};
pub use auth::{
    load_verification_key, AuthService, LoginAttempt, ProofVerifier, SessionIssuer,
    VerifiedLogin,
};
pub use config::{
    default_data_dir, ApiConfig, LogLevel, LoggingConfig, RateLimitConfig, ServerConfig,
    CONFIG_FILE_NAME,
};
pub use storage::{
    AuthStorage, SessionStore, StorageConfig, StorageMetrics, StorageMetricsSnapshot, UserStore,
};

#[cfg(test)]
pub(crate) mod testing {
    use crate::auth::LoginAttempt;
    use crate::storage::UserStore;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use std::sync::{Arc, OnceLock};
    use zkauth_crypto::{
        derive_commitment, setup_auth_keys, ProofProver, ProvingArtifacts, VerificationKey,
        VerificationKeyDocument,
    };

    pub const ALICE_SECRET: &str = "mysecret";
    pub const ALICE_NONCE: &str = "n-001";

    const FIXTURE_SEED: u64 = 0x7a6b_6175_7468;

    struct Fixture {
        artifacts: Arc<ProvingArtifacts>,
        key: Arc<VerificationKey>,
    }

    static FIXTURE: OnceLock<Fixture> = OnceLock::new();

    fn fixture() -> &'static Fixture {
        FIXTURE.get_or_init(|| {
            let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
            let (pk, vk) = setup_auth_keys(&mut rng).unwrap();
            let key = VerificationKey::from_verifying_key(&vk).unwrap();
            Fixture {
                artifacts: Arc::new(ProvingArtifacts::new(pk)),
                key: Arc::new(key),
            }
        })
    }

    pub fn fixture_prover() -> ProofProver {
        ProofProver::new(fixture().artifacts.clone())
    }

    pub fn fixture_verification_key() -> Arc<VerificationKey> {
        fixture().key.clone()
    }

    pub fn fixture_key_document() -> VerificationKeyDocument {
        VerificationKeyDocument::from_verifying_key(fixture().artifacts.verifying_key())
    }

    pub fn alice_commitment() -> String {
        derive_commitment(ALICE_SECRET, ALICE_NONCE).to_canonical()
    }

    pub async fn register_alice(store: &dyn UserStore) {
        store
            .create_user("alice", &alice_commitment(), ALICE_NONCE)
            .await
            .unwrap();
    }

    /// Proves `secret` against alice's registered commitment.
    pub fn login_attempt(username: &str, secret: &str, nonce: &str) -> LoginAttempt {
        let bundle = fixture_prover()
            .prove(secret, nonce, &alice_commitment())
            .unwrap();
        LoginAttempt {
            username: username.to_string(),
            proof: serde_json::to_value(&bundle.proof).unwrap(),
            public_signals: bundle.public_signals.to_strings(),
        }
    }
}
