use super::session::SessionIssuer;
use super::verifier::{LoginAttempt, ProofVerifier};
use crate::storage::{SessionStore, UserStore};
use std::sync::Arc;
use tracing::info;
use zkauth_crypto::{FieldElement, VerificationKey};
use zkauth_types::{
    validate_nonce, validate_username, SessionGrant, UserId, ZkAuthError, ZkAuthResult,
};

/// Registration and login over a user store, a session store and an
/// optional verification key.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    verifier: ProofVerifier,
    issuer: SessionIssuer,
}

impl AuthService {
    pub fn new<S>(store: Arc<S>, key: Option<Arc<VerificationKey>>) -> Self
    where
        S: UserStore + SessionStore + 'static,
    {
        Self {
            users: store.clone(),
            verifier: ProofVerifier::new(key, store.clone()),
            issuer: SessionIssuer::new(store),
        }
    }

    pub fn verifier_ready(&self) -> bool {
        self.verifier.is_ready()
    }

    pub async fn register(
        &self,
        username: &str,
        commitment: &str,
        nonce: &str,
    ) -> ZkAuthResult<UserId> {
        validate_username(username)?;
        FieldElement::from_canonical(commitment).map_err(|e| match e {
            ZkAuthError::Validation(msg) => ZkAuthError::Validation(format!("commitment: {}", msg)),
            other => other,
        })?;
        validate_nonce(nonce)?;

        let id = self.users.create_user(username, commitment, nonce).await?;
        info!(%username, user = %id, "User registered");
        Ok(id)
    }

    pub async fn login(&self, attempt: &LoginAttempt) -> ZkAuthResult<SessionGrant> {
        let verified = self.verifier.verify(attempt).await?;
        let session = self.issuer.issue(verified.user.id, &verified.proof).await?;

        info!(username = %verified.user.username, session = %session.id, "Login succeeded");
        Ok(SessionGrant {
            user: verified.user,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AuthStorage;
    use crate::testing::{
        alice_commitment, fixture_verification_key, login_attempt, ALICE_NONCE, ALICE_SECRET,
    };
    use zkauth_types::{session_ttl, AuthFailure, ErrorKind};

    fn service() -> (AuthService, Arc<AuthStorage>) {
        let storage = Arc::new(AuthStorage::in_memory().unwrap());
        let service = AuthService::new(storage.clone(), Some(fixture_verification_key()));
        (service, storage)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, storage) = service();
        let id = service
            .register("alice", &alice_commitment(), ALICE_NONCE)
            .await
            .unwrap();

        let grant = service
            .login(&login_attempt("alice", ALICE_SECRET, ALICE_NONCE))
            .await
            .unwrap();
        assert_eq!(grant.user.id, id);
        assert_eq!(grant.session.user_id, id);
        assert_eq!(grant.session.ttl(), session_ttl());
        assert!(storage.find_session(grant.session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let (service, _) = service();
        service
            .register("alice", &alice_commitment(), ALICE_NONCE)
            .await
            .unwrap();

        let err = service
            .register("alice", &alice_commitment(), "n-002")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (service, storage) = service();
        let commitment = alice_commitment();

        for (username, commitment, nonce) in [
            ("", commitment.as_str(), ALICE_NONCE),
            ("alice", "", ALICE_NONCE),
            ("alice", "xyz", ALICE_NONCE),
            ("alice", commitment.as_str(), ""),
        ] {
            let err = service.register(username, commitment, nonce).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert_eq!(storage.tree_sizes().users, 0);
    }

    #[tokio::test]
    async fn test_failed_login_issues_no_session() {
        let (service, storage) = service();
        service
            .register("alice", &alice_commitment(), ALICE_NONCE)
            .await
            .unwrap();

        let err = service
            .login(&login_attempt("alice", "wrongsecret", ALICE_NONCE))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ZkAuthError::AuthenticationFailed(AuthFailure::OutputFlagRejected)
        ));
        assert_eq!(storage.tree_sizes().sessions, 0);
    }

    #[tokio::test]
    async fn test_repeated_logins_get_distinct_sessions() {
        let (service, _) = service();
        service
            .register("alice", &alice_commitment(), ALICE_NONCE)
            .await
            .unwrap();
        let attempt = login_attempt("alice", ALICE_SECRET, ALICE_NONCE);

        let first = service.login(&attempt).await.unwrap();
        let second = service.login(&attempt).await.unwrap();
        assert_ne!(first.session.id, second.session.id);
    }

    #[tokio::test]
    async fn test_registration_works_without_key() {
        let storage = Arc::new(AuthStorage::in_memory().unwrap());
        let service = AuthService::new(storage, None);
        assert!(!service.verifier_ready());

        service
            .register("alice", &alice_commitment(), ALICE_NONCE)
            .await
            .unwrap();
        let err = service
            .login(&login_attempt("alice", ALICE_SECRET, ALICE_NONCE))
            .await
            .unwrap_err();
        assert!(matches!(err, ZkAuthError::VerifierUnavailable(_)));
    }
}
