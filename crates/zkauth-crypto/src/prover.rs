//! Client-side proof generation.

use crate::circuit::AuthCircuit;
use crate::commitment::{nonce_to_field, secret_to_field};
use crate::field::FieldElement;
use crate::keys::ProvingArtifacts;
use crate::proof::ProofDocument;
use crate::signals::PublicSignals;
use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use rand::thread_rng;
use std::path::Path;
use std::sync::Arc;
use zkauth_types::{validate_nonce, ZkAuthError, ZkAuthResult};

/// Output of a proving run: the only values that leave the client.
#[derive(Clone, Debug)]
pub struct ProofBundle {
    pub proof: ProofDocument,
    pub public_signals: PublicSignals,
}

#[derive(Clone)]
pub struct ProofProver {
    artifacts: Arc<ProvingArtifacts>,
}

impl ProofProver {
    pub fn new(artifacts: Arc<ProvingArtifacts>) -> Self {
        Self { artifacts }
    }

    pub fn from_file(path: &Path) -> ZkAuthResult<Self> {
        Ok(Self::new(Arc::new(ProvingArtifacts::load(path)?)))
    }

    /// Proves knowledge of `(secret, nonce)` against `claimed_commitment`.
    ///
    /// A wrong secret still yields a valid proof, with the output flag
    /// cleared. Runs for as long as Groth16 proving takes; callers on an
    /// async runtime should move it to a blocking thread.
    pub fn prove(
        &self,
        secret: &str,
        nonce: &str,
        claimed_commitment: &str,
    ) -> ZkAuthResult<ProofBundle> {
        self.prove_with_rng(secret, nonce, claimed_commitment, &mut thread_rng())
    }

    pub fn prove_with_rng<R: RngCore + CryptoRng>(
        &self,
        secret: &str,
        nonce: &str,
        claimed_commitment: &str,
        rng: &mut R,
    ) -> ZkAuthResult<ProofBundle> {
        if secret.is_empty() {
            return Err(ZkAuthError::ProofGeneration("secret must not be empty".into()));
        }
        validate_nonce(nonce).map_err(|e| ZkAuthError::ProofGeneration(e.to_string()))?;
        let commitment = FieldElement::from_canonical(claimed_commitment)
            .map_err(|e| ZkAuthError::ProofGeneration(format!("claimed commitment: {}", e)))?;

        let nonce_field = nonce_to_field(nonce);
        let circuit = AuthCircuit::new(secret_to_field(secret), nonce_field, commitment);
        let output_flag = circuit.expected_output_flag().ok_or_else(|| {
            ZkAuthError::ProofGeneration("circuit assignment incomplete".into())
        })?;

        let proof = Groth16::<Bn254>::prove(self.artifacts.proving_key(), circuit, rng)
            .map_err(|e| ZkAuthError::ProofGeneration(format!("Groth16 proving failed: {}", e)))?;

        Ok(ProofBundle {
            proof: ProofDocument::from_proof(&proof),
            public_signals: PublicSignals {
                output_flag,
                commitment,
                nonce: nonce_field,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::derive_commitment;
    use crate::testing::test_prover;

    #[test]
    fn test_matching_secret_sets_flag() {
        let commitment = derive_commitment("mysecret", "n-001").to_canonical();
        let bundle = test_prover().prove("mysecret", "n-001", &commitment).unwrap();

        assert!(bundle.public_signals.flag_is_set());
        assert_eq!(bundle.public_signals.commitment.to_canonical(), commitment);
        assert_eq!(bundle.public_signals.nonce, nonce_to_field("n-001"));
        assert!(bundle.proof.to_proof().is_ok());
    }

    #[test]
    fn test_wrong_secret_clears_flag() {
        let commitment = derive_commitment("mysecret", "n-001").to_canonical();
        let bundle = test_prover().prove("wrongsecret", "n-001", &commitment).unwrap();
        assert!(!bundle.public_signals.flag_is_set());
    }

    #[test]
    fn test_malformed_inputs() {
        let prover = test_prover();
        let commitment = derive_commitment("s", "n").to_canonical();

        for (secret, nonce, claimed) in [
            ("", "n", commitment.as_str()),
            ("s", "", commitment.as_str()),
            ("s", "n", "not-a-field-element"),
        ] {
            assert!(matches!(
                prover.prove(secret, nonce, claimed),
                Err(ZkAuthError::ProofGeneration(_))
            ));
        }
    }

    #[test]
    fn test_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProofProver::from_file(&dir.path().join("auth.pk.bin"));
        assert!(matches!(result, Err(ZkAuthError::ProofGeneration(_))));
    }
}
