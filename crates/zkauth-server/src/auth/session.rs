use crate::storage::SessionStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use zkauth_crypto::ProofDocument;
use zkauth_types::{session_ttl, NewSession, Session, UserId, ZkAuthResult};

/// Creates a session record for every accepted login.
#[derive(Clone)]
pub struct SessionIssuer {
    sessions: Arc<dyn SessionStore>,
}

impl SessionIssuer {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn issue(&self, user_id: UserId, proof: &ProofDocument) -> ZkAuthResult<Session> {
        self.issue_at(user_id, proof, Utc::now()).await
    }

    /// Sessions expire exactly one TTL after `now` and record a digest of
    /// the proof, never the proof itself.
    pub async fn issue_at(
        &self,
        user_id: UserId,
        proof: &ProofDocument,
        now: DateTime<Utc>,
    ) -> ZkAuthResult<Session> {
        let new = NewSession {
            user_id,
            proof_digest: proof.digest()?,
            created_at: now,
            expires_at: now + session_ttl(),
        };

        let id = self.sessions.create_session(new.clone()).await?;
        debug!(session = %id, user = %user_id, "Session issued");
        Ok(Session::from_new(id, new))
    }
}
