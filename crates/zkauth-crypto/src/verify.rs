//! Groth16 verification of a login proof against its public signals.

use crate::keys::VerificationKey;
use crate::proof::ProofDocument;
use crate::signals::PublicSignals;
use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_snark::SNARK;
use zkauth_types::{ZkAuthError, ZkAuthResult};

impl VerificationKey {
    /// Checks the proof only. Protocol checks on the signal values belong to
    /// the caller.
    ///
    /// Returns `Ok(false)` for a well-formed proof that does not verify and
    /// `Err(Crypto)` when the proof cannot be decoded or checked at all.
    pub fn verify(&self, proof: &ProofDocument, signals: &PublicSignals) -> ZkAuthResult<bool> {
        let proof = proof.to_proof().map_err(|e| ZkAuthError::Crypto(e.to_string()))?;
        Groth16::<Bn254>::verify_with_processed_vk(
            self.prepared(),
            &signals.to_public_inputs(),
            &proof,
        )
        .map_err(|e| ZkAuthError::Crypto(format!("Groth16 verification failed: {}", e)))
    }
}
