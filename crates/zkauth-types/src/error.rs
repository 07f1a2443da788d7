use thiserror::Error;

/// Why a login proof was rejected.
///
/// Kept for server-side logs only. Every variant reaches the caller as the
/// same undifferentiated authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    InvalidProof,
    OutputFlagRejected,
    CommitmentMismatch,
    NonceMismatch,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFailure::InvalidProof => write!(f, "invalid proof"),
            AuthFailure::OutputFlagRejected => write!(f, "output flag is not set"),
            AuthFailure::CommitmentMismatch => write!(f, "commitment mismatch"),
            AuthFailure::NonceMismatch => write!(f, "nonce mismatch"),
        }
    }
}

/// Coarse error classes exposed at the protocol boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Authentication,
    Infrastructure,
}

#[derive(Error, Debug)]
pub enum ZkAuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(AuthFailure),

    #[error("Verifier unavailable: {0}")]
    VerifierUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Proof generation error: {0}")]
    ProofGeneration(String),

    #[error("Proof generation cancelled")]
    Cancelled,

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ZkAuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZkAuthError::Validation(_) | ZkAuthError::ProofGeneration(_) => ErrorKind::Validation,
            ZkAuthError::Conflict(_) => ErrorKind::Conflict,
            ZkAuthError::NotFound(_) => ErrorKind::NotFound,
            ZkAuthError::AuthenticationFailed(_) => ErrorKind::Authentication,
            ZkAuthError::VerifierUnavailable(_)
            | ZkAuthError::Storage(_)
            | ZkAuthError::Cancelled
            | ZkAuthError::Crypto(_)
            | ZkAuthError::Serialization(_)
            | ZkAuthError::Config(_)
            | ZkAuthError::Network(_)
            | ZkAuthError::Internal(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn is_infrastructure(&self) -> bool {
        self.kind() == ErrorKind::Infrastructure
    }
}

pub type ZkAuthResult<T> = Result<T, ZkAuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_share_one_kind() {
        for reason in [
            AuthFailure::InvalidProof,
            AuthFailure::OutputFlagRejected,
            AuthFailure::CommitmentMismatch,
            AuthFailure::NonceMismatch,
        ] {
            assert_eq!(
                ZkAuthError::AuthenticationFailed(reason).kind(),
                ErrorKind::Authentication
            );
        }
    }

    #[test]
    fn test_infrastructure_classification() {
        assert!(ZkAuthError::VerifierUnavailable("no key".into()).is_infrastructure());
        assert!(ZkAuthError::Storage("io".into()).is_infrastructure());
        assert!(!ZkAuthError::Conflict("alice".into()).is_infrastructure());
        assert_eq!(ZkAuthError::NotFound("bob".into()).kind(), ErrorKind::NotFound);
    }
}
