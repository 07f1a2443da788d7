use super::{AuthStorage, SessionStore};
use async_trait::async_trait;
use tracing::debug;
use zkauth_types::{NewSession, Session, SessionId, ZkAuthError, ZkAuthResult};

#[async_trait]
impl SessionStore for AuthStorage {
    async fn create_session(&self, new: NewSession) -> ZkAuthResult<SessionId> {
        let session = Session::from_new(SessionId::generate(), new);
        let value = serde_json::to_vec(&session).map_err(|e| {
            ZkAuthError::Serialization(format!("Failed to serialize session: {}", e))
        })?;
        let size = value.len();

        // v4 ids do not collide in practice; refuse to overwrite if one does
        let swapped = self
            .sessions
            .compare_and_swap(session.id.0.as_bytes(), None::<&[u8]>, Some(value))
            .map_err(|e| self.storage_error("Failed to insert session", e))?;
        if swapped.is_err() {
            return Err(self.storage_error("Failed to insert session", "duplicate session id"));
        }

        self.metrics.record_write(size);
        debug!(session_id = %session.id, user_id = %session.user_id, "Stored session");
        Ok(session.id)
    }

    async fn find_session(&self, id: SessionId) -> ZkAuthResult<Option<Session>> {
        let Some(bytes) = self
            .sessions
            .get(id.0.as_bytes())
            .map_err(|e| self.storage_error("Failed to read session", e))?
        else {
            return Ok(None);
        };

        self.metrics.record_read(bytes.len());
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| self.storage_error("Corrupt session record", e))
    }
}
