#![forbid(unsafe_code)]
#![warn(clippy::all)]

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

mod error;

pub use error::{AuthFailure, ErrorKind, ZkAuthError, ZkAuthResult};

/// Lifetime of a session from the moment it is issued.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Number of entries in a login proof's public signals.
pub const PUBLIC_SIGNAL_COUNT: usize = 3;

pub const MAX_USERNAME_LEN: usize = 64;

pub const MAX_NONCE_LEN: usize = 256;

/// Fixed session TTL as a chrono duration.
pub fn session_ttl() -> Duration {
    Duration::seconds(SESSION_TTL_SECS)
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0.hyphenated())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> ZkAuthResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| ZkAuthError::Validation(format!("Invalid session id: {}", e)))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0.hyphenated())
    }
}

/// A registered account.
///
/// `commitment` is the canonical field-element string the client derived from
/// its secret and `nonce`. The server stores it verbatim and never re-derives
/// it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub commitment: String,
    pub nonce: String,
    pub created_at: DateTime<Utc>,
}

/// Input to `createSession`; the store assigns nothing but the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSession {
    pub user_id: UserId,
    pub proof_digest: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// An immutable login session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub proof_digest: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn from_new(id: SessionId, new: NewSession) -> Self {
        Self {
            id,
            user_id: new.user_id,
            proof_digest: new.proof_digest,
            created_at: new.created_at,
            expires_at: new.expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn ttl(&self) -> Duration {
        self.expires_at - self.created_at
    }
}

/// What a successful login hands back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionGrant {
    pub user: User,
    pub session: Session,
}

pub fn validate_username(username: &str) -> ZkAuthResult<()> {
    if username.is_empty() {
        return Err(ZkAuthError::Validation("username must not be empty".into()));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ZkAuthError::Validation(format!(
            "username must not exceed {} bytes",
            MAX_USERNAME_LEN
        )));
    }
    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ZkAuthError::Validation(
            "username must not contain whitespace or control characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_nonce(nonce: &str) -> ZkAuthResult<()> {
    if nonce.is_empty() {
        return Err(ZkAuthError::Validation("nonce must not be empty".into()));
    }
    if nonce.len() > MAX_NONCE_LEN {
        return Err(ZkAuthError::Validation(format!(
            "nonce must not exceed {} bytes",
            MAX_NONCE_LEN
        )));
    }
    Ok(())
}
