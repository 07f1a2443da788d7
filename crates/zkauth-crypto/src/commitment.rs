//! Commitment derivation shared by the client, the prover and the circuit.
//!
//! `commitment = Poseidon(secret_field, nonce_field)` where each string is
//! mapped to the field through a domain-separated BLAKE3 key derivation of
//! its UTF-8 bytes.

use crate::field::FieldElement;
use crate::poseidon::poseidon_hash2_fields;
use ark_bn254::Fr;
use ark_ff::PrimeField;

const SECRET_CONTEXT: &str = "zk-auth 2024-01-01 commitment secret";
const NONCE_CONTEXT: &str = "zk-auth 2024-01-01 commitment nonce";

fn string_to_field(context: &str, value: &str) -> Fr {
    let bytes = blake3::derive_key(context, value.as_bytes());
    Fr::from_le_bytes_mod_order(&bytes)
}

/// Field encoding of the private secret.
pub fn secret_to_field(secret: &str) -> FieldElement {
    FieldElement::from_fr(string_to_field(SECRET_CONTEXT, secret))
}

/// Field encoding of a nonce. The verifier recomputes this from the stored
/// nonce and compares it against the third public signal.
pub fn nonce_to_field(nonce: &str) -> FieldElement {
    FieldElement::from_fr(string_to_field(NONCE_CONTEXT, nonce))
}

pub fn commitment_from_fields(secret: FieldElement, nonce: FieldElement) -> FieldElement {
    FieldElement::from_fr(poseidon_hash2_fields(secret.inner(), nonce.inner()))
}

/// Derives the commitment registered for `(secret, nonce)`.
pub fn derive_commitment(secret: &str, nonce: &str) -> FieldElement {
    commitment_from_fields(secret_to_field(secret), nonce_to_field(nonce))
}
