use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use zkauth_crypto::ProofBundle;
use zkauth_types::{AuthFailure, SessionId, UserId, ZkAuthError, ZkAuthResult};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3001";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    commitment: &'a str,
    nonce: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody<'a> {
    username: &'a str,
    proof: &'a zkauth_crypto::ProofDocument,
    public_signals: &'a zkauth_crypto::PublicSignals,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginOutcome {
    pub user: LoggedInUser,
    pub session: IssuedSession,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggedInUser {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedSession {
    pub id: SessionId,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerHealth {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub verifier_ready: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct AuthClient {
    base_url: String,
    client: Client,
}

impl AuthClient {
    pub fn new(base_url: &str) -> ZkAuthResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ZkAuthError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register(&self, username: &str, commitment: &str, nonce: &str) -> ZkAuthResult<()> {
        let url = format!("{}/api/auth/register", self.base_url);
        debug!("HTTP POST: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&RegisterBody {
                username,
                commitment,
                nonce,
            })
            .send()
            .await
            .map_err(|e| ZkAuthError::Network(format!("HTTP POST failed: {}", e)))?;

        check_status(response).await.map(|_| ())
    }

    pub async fn login(&self, username: &str, bundle: &ProofBundle) -> ZkAuthResult<LoginOutcome> {
        let url = format!("{}/api/auth/login", self.base_url);
        debug!("HTTP POST: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&LoginBody {
                username,
                proof: &bundle.proof,
                public_signals: &bundle.public_signals,
            })
            .send()
            .await
            .map_err(|e| ZkAuthError::Network(format!("HTTP POST failed: {}", e)))?;

        decode(check_status(response).await?).await
    }

    pub async fn health(&self) -> ZkAuthResult<ServerHealth> {
        let url = format!("{}/health", self.base_url);
        debug!("HTTP GET: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ZkAuthError::Network(format!("HTTP GET failed: {}", e)))?;

        decode(check_status(response).await?).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ZkAuthResult<T> {
    response
        .json()
        .await
        .map_err(|e| ZkAuthError::Serialization(format!("Invalid server response: {}", e)))
}

/// Maps error statuses back onto the error classes the server produced them
/// from.
async fn check_status(response: Response) -> ZkAuthResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error.message)
        .unwrap_or_else(|_| status.to_string());

    Err(error_for_status(status, message))
}

fn error_for_status(status: StatusCode, message: String) -> ZkAuthError {
    match status {
        StatusCode::BAD_REQUEST => ZkAuthError::Validation(message),
        StatusCode::CONFLICT => ZkAuthError::Conflict(message),
        StatusCode::NOT_FOUND => ZkAuthError::NotFound(message),
        // The server never says why
        StatusCode::UNAUTHORIZED => ZkAuthError::AuthenticationFailed(AuthFailure::InvalidProof),
        StatusCode::TOO_MANY_REQUESTS => ZkAuthError::Network(format!("rate limited: {}", message)),
        s if s.is_server_error() => ZkAuthError::Internal(format!("server error: {}", message)),
        s => ZkAuthError::Network(format!("unexpected status {}: {}", s, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        fixture_prover, spawn_server, test_commitment, TEST_NONCE, TEST_SECRET,
    };
    use zkauth_types::ErrorKind;

    #[test]
    fn test_status_mapping() {
        let kind = |s| error_for_status(s, "m".into()).kind();
        assert_eq!(kind(StatusCode::BAD_REQUEST), ErrorKind::Validation);
        assert_eq!(kind(StatusCode::CONFLICT), ErrorKind::Conflict);
        assert_eq!(kind(StatusCode::NOT_FOUND), ErrorKind::NotFound);
        assert_eq!(kind(StatusCode::UNAUTHORIZED), ErrorKind::Authentication);
        assert_eq!(kind(StatusCode::INTERNAL_SERVER_ERROR), ErrorKind::Infrastructure);
        assert_eq!(kind(StatusCode::TOO_MANY_REQUESTS), ErrorKind::Infrastructure);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = AuthClient::new("http://localhost:3001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[tokio::test]
    async fn test_round_trip_against_server() {
        let base_url = spawn_server(true).await;
        let client = AuthClient::new(&base_url).unwrap();

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "OK");
        assert!(health.verifier_ready);

        client
            .register("alice", &test_commitment(), TEST_NONCE)
            .await
            .unwrap();
        let err = client
            .register("alice", &test_commitment(), TEST_NONCE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let bundle = fixture_prover()
            .prove(TEST_SECRET, TEST_NONCE, &test_commitment())
            .unwrap();
        let outcome = client.login("alice", &bundle).await.unwrap();
        assert_eq!(outcome.user.username, "alice");
        assert!(outcome.session.expires_at > Utc::now());

        let wrong = fixture_prover()
            .prove("wrongsecret", TEST_NONCE, &test_commitment())
            .unwrap();
        let err = client.login("alice", &wrong).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);

        let err = client.login("nobody", &bundle).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_login_without_server_key() {
        let base_url = spawn_server(false).await;
        let client = AuthClient::new(&base_url).unwrap();
        assert!(!client.health().await.unwrap().verifier_ready);

        client
            .register("alice", &test_commitment(), TEST_NONCE)
            .await
            .unwrap();
        let bundle = fixture_prover()
            .prove(TEST_SECRET, TEST_NONCE, &test_commitment())
            .unwrap();
        let err = client.login("alice", &bundle).await.unwrap_err();
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = AuthClient::new("http://127.0.0.1:1").unwrap();
        assert!(matches!(client.health().await, Err(ZkAuthError::Network(_))));
    }
}
