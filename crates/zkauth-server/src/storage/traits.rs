use async_trait::async_trait;
use zkauth_types::{NewSession, Session, SessionId, User, UserId, ZkAuthResult};

/// Persistence contract for registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, failing with `Conflict` if the username is taken.
    /// Must be a single atomic insert-or-fail, never check-then-insert.
    async fn create_user(&self, username: &str, commitment: &str, nonce: &str)
        -> ZkAuthResult<UserId>;

    async fn find_user_by_username(&self, username: &str) -> ZkAuthResult<Option<User>>;
}

/// Append-only persistence contract for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, session: NewSession) -> ZkAuthResult<SessionId>;

    async fn find_session(&self, id: SessionId) -> ZkAuthResult<Option<Session>>;
}
