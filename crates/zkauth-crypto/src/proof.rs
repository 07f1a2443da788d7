//! Groth16 proof JSON document.

use crate::encoding::{g1_from_json, g1_to_json, g2_from_json, g2_to_json, G1Json, G2Json};
use ark_bn254::Bn254;
use ark_groth16::Proof;
use ark_serialize::CanonicalSerialize;
use serde::{Deserialize, Serialize};
use zkauth_types::{ZkAuthError, ZkAuthResult};

pub const PROTOCOL: &str = "groth16";
pub const CURVE: &str = "bn128";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofDocument {
    pub pi_a: G1Json,
    pub pi_b: G2Json,
    pub pi_c: G1Json,
    pub protocol: String,
    pub curve: String,
}

impl ProofDocument {
    pub fn from_proof(proof: &Proof<Bn254>) -> Self {
        Self {
            pi_a: g1_to_json(&proof.a),
            pi_b: g2_to_json(&proof.b),
            pi_c: g1_to_json(&proof.c),
            protocol: PROTOCOL.into(),
            curve: CURVE.into(),
        }
    }

    /// Decodes the curve points, checking each is on the curve and in the
    /// prime-order subgroup.
    pub fn to_proof(&self) -> ZkAuthResult<Proof<Bn254>> {
        if self.protocol != PROTOCOL {
            return Err(ZkAuthError::Serialization(format!(
                "unsupported proof protocol: {}",
                self.protocol
            )));
        }
        if self.curve != CURVE {
            return Err(ZkAuthError::Serialization(format!(
                "unsupported proof curve: {}",
                self.curve
            )));
        }

        Ok(Proof {
            a: g1_from_json(&self.pi_a)?,
            b: g2_from_json(&self.pi_b)?,
            c: g1_from_json(&self.pi_c)?,
        })
    }

    pub fn from_json_value(value: serde_json::Value) -> ZkAuthResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| ZkAuthError::Serialization(format!("malformed proof: {}", e)))
    }

    pub fn digest(&self) -> ZkAuthResult<String> {
        proof_digest(&self.to_proof()?)
    }
}

/// Hex BLAKE3 digest of a proof's compressed serialization.
pub fn proof_digest(proof: &Proof<Bn254>) -> ZkAuthResult<String> {
    let mut bytes = Vec::new();
    proof
        .serialize_compressed(&mut bytes)
        .map_err(|e| ZkAuthError::Serialization(format!("proof serialization failed: {}", e)))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{G1Affine, G2Affine};
    use ark_ec::AffineRepr;

    fn generator_proof() -> Proof<Bn254> {
        Proof {
            a: G1Affine::generator(),
            b: G2Affine::generator(),
            c: G1Affine::generator(),
        }
    }

    #[test]
    fn test_document_shape() {
        let doc = ProofDocument::from_proof(&generator_proof());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["protocol"], "groth16");
        assert_eq!(json["curve"], "bn128");
        assert_eq!(json["pi_a"].as_array().unwrap().len(), 3);
        assert_eq!(json["pi_b"][2], serde_json::json!(["1", "0"]));
        assert_eq!(doc.to_proof().unwrap(), generator_proof());
    }

    #[test]
    fn test_wrong_protocol_rejected() {
        let mut doc = ProofDocument::from_proof(&generator_proof());
        doc.protocol = "plonk".into();
        assert!(doc.to_proof().is_err());
    }

    #[test]
    fn test_short_coordinate_list_rejected() {
        let mut json = serde_json::to_value(ProofDocument::from_proof(&generator_proof())).unwrap();
        json["pi_a"] = serde_json::json!(["1", "2"]);
        assert!(ProofDocument::from_json_value(json).is_err());
    }

    #[test]
    fn test_digest_is_stable_hex() {
        let d1 = proof_digest(&generator_proof()).unwrap();
        let d2 = proof_digest(&generator_proof()).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
    }
}
