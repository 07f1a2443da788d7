mod service;
mod session;
mod verifier;

pub use service::AuthService;
pub use session::SessionIssuer;
pub use verifier::{LoginAttempt, ProofVerifier, VerifiedLogin};

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use zkauth_crypto::VerificationKey;

/// Loads the verification key once at startup.
///
/// A missing or invalid key is not fatal: the server keeps serving
/// registrations and answers every login with an infrastructure error.
pub fn load_verification_key(path: &Path) -> Option<Arc<VerificationKey>> {
    if !path.exists() {
        warn!("Verification key not found at {:?}, logins are disabled", path);
        return None;
    }

    match VerificationKey::load(path) {
        Ok(key) => {
            info!(fingerprint = %key.fingerprint(), "Verification key loaded from {:?}", path);
            Some(Arc::new(key))
        }
        Err(e) => {
            warn!("Failed to load verification key from {:?}: {}", path, e);
            None
        }
    }
}
