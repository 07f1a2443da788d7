//! The login circuit.
//!
//! Public inputs, in allocation order: `output_flag`, `commitment`, `nonce`.
//! The secret is the only witness. The circuit enforces
//! `output_flag == (Poseidon(secret, nonce) == commitment)`, so a proof always
//! exists and the flag carries the verdict.

use crate::commitment::commitment_from_fields;
use crate::field::FieldElement;
use crate::poseidon::poseidon_hash2_gadget;
use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_r1cs_std::{alloc::AllocVar, eq::EqGadget, fields::fp::FpVar};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use zkauth_types::{ZkAuthError, ZkAuthResult};

#[derive(Clone, Debug, Default)]
pub struct AuthCircuit {
    pub secret: Option<Fr>,
    pub nonce: Option<Fr>,
    pub commitment: Option<Fr>,
}

impl AuthCircuit {
    pub fn new(secret: FieldElement, nonce: FieldElement, commitment: FieldElement) -> Self {
        Self {
            secret: Some(secret.inner()),
            nonce: Some(nonce.inner()),
            commitment: Some(commitment.inner()),
        }
    }

    /// Shape-only instance for key generation.
    pub fn blank() -> Self {
        Self::new(FieldElement::zero(), FieldElement::zero(), FieldElement::zero())
    }

    /// `1` when the assigned secret and nonce open the assigned commitment,
    /// `0` otherwise. `None` while any assignment is missing.
    pub fn expected_output_flag(&self) -> Option<FieldElement> {
        let derived = commitment_from_fields(
            FieldElement::from_fr(self.secret?),
            FieldElement::from_fr(self.nonce?),
        );
        let claimed = FieldElement::from_fr(self.commitment?);
        Some(if derived == claimed {
            FieldElement::one()
        } else {
            FieldElement::zero()
        })
    }
}

impl ConstraintSynthesizer<Fr> for AuthCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let flag = self.expected_output_flag().map(|f| f.inner());

        let flag_var = FpVar::new_input(cs.clone(), || {
            flag.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let commitment_var = FpVar::new_input(cs.clone(), || {
            self.commitment.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let nonce_var = FpVar::new_input(cs.clone(), || {
            self.nonce.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let secret_var = FpVar::new_witness(cs.clone(), || {
            self.secret.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let derived = poseidon_hash2_gadget(cs, &secret_var, &nonce_var)?;
        let matches = derived.is_eq(&commitment_var)?;
        flag_var.enforce_equal(&FpVar::from(matches))?;

        Ok(())
    }
}

/// Circuit-specific Groth16 setup for [`AuthCircuit`].
pub fn setup_auth_keys<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> ZkAuthResult<(ProvingKey<Bn254>, VerifyingKey<Bn254>)> {
    Groth16::<Bn254>::circuit_specific_setup(AuthCircuit::blank(), rng)
        .map_err(|e| ZkAuthError::Crypto(format!("Groth16 setup failed: {}", e)))
}
