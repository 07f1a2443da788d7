use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zkauth_types::{SessionGrant, SessionId, UserId};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub commitment: String,
    pub nonce: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    /// Missing and `null` are both rejected as a malformed request.
    #[serde(default)]
    pub proof: Option<serde_json::Value>,
    pub public_signals: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserSummary,
    pub session: SessionSummary,
}

impl From<SessionGrant> for LoginResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            success: true,
            user: UserSummary {
                id: grant.user.id,
                username: grant.user.username,
            },
            session: SessionSummary {
                id: grant.session.id,
                expires_at: grant.session.expires_at,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: SessionId,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub verifier_ready: bool,
}
