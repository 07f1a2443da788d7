//! Server-side login verification.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the verifier must hold a verification key (else `VerifierUnavailable`)
//! 2. structural validation of the username and public signals (`Validation`)
//! 3. user lookup (`NotFound`)
//! 4. Groth16 verification (`AuthenticationFailed(InvalidProof)`)
//! 5. signal semantics: output flag, stored commitment, stored nonce
//!
//! Failures from steps 4 and 5 carry an internal reason for logs only.

use crate::storage::UserStore;
use std::sync::Arc;
use tracing::{debug, warn};
use zkauth_crypto::{nonce_to_field, ProofDocument, PublicSignals, VerificationKey};
use zkauth_types::{AuthFailure, User, ZkAuthError, ZkAuthResult};

/// A login request as received from the client.
#[derive(Clone, Debug)]
pub struct LoginAttempt {
    pub username: String,
    /// Kept as raw JSON so a malformed proof is an authentication failure
    /// rather than a validation error.
    pub proof: serde_json::Value,
    pub public_signals: Vec<String>,
}

/// A login that passed every check.
#[derive(Clone, Debug)]
pub struct VerifiedLogin {
    pub user: User,
    pub proof: ProofDocument,
}

#[derive(Clone)]
pub struct ProofVerifier {
    key: Option<Arc<VerificationKey>>,
    users: Arc<dyn UserStore>,
}

impl ProofVerifier {
    /// `key = None` builds a verifier that refuses every login.
    pub fn new(key: Option<Arc<VerificationKey>>, users: Arc<dyn UserStore>) -> Self {
        Self { key, users }
    }

    pub fn is_ready(&self) -> bool {
        self.key.is_some()
    }

    pub async fn verify(&self, attempt: &LoginAttempt) -> ZkAuthResult<VerifiedLogin> {
        let Some(key) = self.key.clone() else {
            return Err(ZkAuthError::VerifierUnavailable(
                "no verification key loaded".into(),
            ));
        };

        if attempt.username.is_empty() {
            return Err(ZkAuthError::Validation("username must not be empty".into()));
        }
        let signals = PublicSignals::parse(&attempt.public_signals)?;

        let user = self
            .users
            .find_user_by_username(&attempt.username)
            .await?
            .ok_or_else(|| {
                ZkAuthError::NotFound(format!("user '{}' not found", attempt.username))
            })?;

        let proof = match ProofDocument::from_json_value(attempt.proof.clone()) {
            Ok(proof) => proof,
            Err(e) => {
                debug!(username = %user.username, "Undecodable proof: {}", e);
                return Err(reject(&user, AuthFailure::InvalidProof));
            }
        };

        let valid = {
            let proof = proof.clone();
            tokio::task::spawn_blocking(move || key.verify(&proof, &signals))
                .await
                .map_err(|e| ZkAuthError::Internal(format!("verification task failed: {}", e)))?
        };
        match valid {
            Ok(true) => {}
            Ok(false) => return Err(reject(&user, AuthFailure::InvalidProof)),
            Err(e) => {
                debug!(username = %user.username, "Proof check errored: {}", e);
                return Err(reject(&user, AuthFailure::InvalidProof));
            }
        }

        if !signals.flag_is_set() {
            return Err(reject(&user, AuthFailure::OutputFlagRejected));
        }
        if signals.commitment.to_canonical() != user.commitment {
            return Err(reject(&user, AuthFailure::CommitmentMismatch));
        }
        if signals.nonce != nonce_to_field(&user.nonce) {
            return Err(reject(&user, AuthFailure::NonceMismatch));
        }

        debug!(username = %user.username, "Proof accepted");
        Ok(VerifiedLogin { user, proof })
    }
}

fn reject(user: &User, reason: AuthFailure) -> ZkAuthError {
    warn!(username = %user.username, %reason, "Login rejected");
    ZkAuthError::AuthenticationFailed(reason)
}
