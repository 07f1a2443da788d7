//! Verification-key documents and proving artifacts.

use crate::encoding::{g1_from_json, g1_to_json, g2_from_json, g2_to_json, G1Json, G2Json};
use crate::proof::{CURVE, PROTOCOL};
use ark_bn254::Bn254;
use ark_groth16::{Groth16, PreparedVerifyingKey, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use zkauth_types::{ZkAuthError, ZkAuthResult, PUBLIC_SIGNAL_COUNT};

/// Groth16 verification key in the common JSON schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKeyDocument {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: G1Json,
    pub vk_beta_2: G2Json,
    pub vk_gamma_2: G2Json,
    pub vk_delta_2: G2Json,
    #[serde(rename = "IC")]
    pub ic: Vec<G1Json>,
}

impl VerificationKeyDocument {
    pub fn from_verifying_key(vk: &VerifyingKey<Bn254>) -> Self {
        Self {
            protocol: PROTOCOL.into(),
            curve: CURVE.into(),
            n_public: vk.gamma_abc_g1.len().saturating_sub(1),
            vk_alpha_1: g1_to_json(&vk.alpha_g1),
            vk_beta_2: g2_to_json(&vk.beta_g2),
            vk_gamma_2: g2_to_json(&vk.gamma_g2),
            vk_delta_2: g2_to_json(&vk.delta_g2),
            ic: vk.gamma_abc_g1.iter().map(g1_to_json).collect(),
        }
    }

    pub fn to_verifying_key(&self) -> ZkAuthResult<VerifyingKey<Bn254>> {
        if self.protocol != PROTOCOL || self.curve != CURVE {
            return Err(ZkAuthError::Config(format!(
                "unsupported verification key: protocol={} curve={}",
                self.protocol, self.curve
            )));
        }
        if self.n_public != PUBLIC_SIGNAL_COUNT {
            return Err(ZkAuthError::Config(format!(
                "verification key declares {} public signals, expected {}",
                self.n_public, PUBLIC_SIGNAL_COUNT
            )));
        }
        if self.ic.len() != self.n_public + 1 {
            return Err(ZkAuthError::Config(format!(
                "verification key IC has {} points, expected {}",
                self.ic.len(),
                self.n_public + 1
            )));
        }

        let config_err = |e: ZkAuthError| ZkAuthError::Config(format!("verification key: {}", e));
        let gamma_abc_g1 = self
            .ic
            .iter()
            .map(g1_from_json)
            .collect::<ZkAuthResult<Vec<_>>>()
            .map_err(config_err)?;

        Ok(VerifyingKey {
            alpha_g1: g1_from_json(&self.vk_alpha_1).map_err(config_err)?,
            beta_g2: g2_from_json(&self.vk_beta_2).map_err(config_err)?,
            gamma_g2: g2_from_json(&self.vk_gamma_2).map_err(config_err)?,
            delta_g2: g2_from_json(&self.vk_delta_2).map_err(config_err)?,
            gamma_abc_g1,
        })
    }

    /// BLAKE3 over the compact JSON serialization.
    pub fn fingerprint(&self) -> ZkAuthResult<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| ZkAuthError::Serialization(format!("verification key: {}", e)))?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    pub fn load(path: &Path) -> ZkAuthResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ZkAuthError::Config(format!(
                "cannot read verification key {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            ZkAuthError::Config(format!(
                "cannot parse verification key {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn save(&self, path: &Path) -> ZkAuthResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ZkAuthError::Serialization(e.to_string()))?;
        fs::write(path, contents)
            .map_err(|e| ZkAuthError::Config(format!("cannot write {}: {}", path.display(), e)))
    }
}

/// A validated, prepared verification key. Immutable once built.
#[derive(Clone)]
pub struct VerificationKey {
    prepared: PreparedVerifyingKey<Bn254>,
    fingerprint: String,
}

impl VerificationKey {
    pub fn from_document(doc: &VerificationKeyDocument) -> ZkAuthResult<Self> {
        let vk = doc.to_verifying_key()?;
        let prepared = Groth16::<Bn254>::process_vk(&vk)
            .map_err(|e| ZkAuthError::Crypto(format!("cannot prepare verification key: {}", e)))?;
        Ok(Self {
            prepared,
            fingerprint: doc.fingerprint()?,
        })
    }

    pub fn from_verifying_key(vk: &VerifyingKey<Bn254>) -> ZkAuthResult<Self> {
        Self::from_document(&VerificationKeyDocument::from_verifying_key(vk))
    }

    pub fn load(path: &Path) -> ZkAuthResult<Self> {
        Self::from_document(&VerificationKeyDocument::load(path)?)
    }

    pub fn prepared(&self) -> &PreparedVerifyingKey<Bn254> {
        &self.prepared
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKey")
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

/// Groth16 proving key for the login circuit.
pub struct ProvingArtifacts {
    proving_key: ProvingKey<Bn254>,
}

impl ProvingArtifacts {
    pub fn new(proving_key: ProvingKey<Bn254>) -> Self {
        Self { proving_key }
    }

    /// Loads a compressed proving key. A missing or corrupt file is a
    /// proof-generation failure on the client.
    pub fn load(path: &Path) -> ZkAuthResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            ZkAuthError::ProofGeneration(format!(
                "proving key {} unavailable: {}",
                path.display(),
                e
            ))
        })?;
        let proving_key = ProvingKey::<Bn254>::deserialize_compressed(&bytes[..]).map_err(|e| {
            ZkAuthError::ProofGeneration(format!("proving key {} is corrupt: {}", path.display(), e))
        })?;
        Ok(Self { proving_key })
    }

    pub fn save(&self, path: &Path) -> ZkAuthResult<()> {
        let mut bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| ZkAuthError::Serialization(format!("proving key: {}", e)))?;
        fs::write(path, bytes)
            .map_err(|e| ZkAuthError::Config(format!("cannot write {}: {}", path.display(), e)))
    }

    pub fn proving_key(&self) -> &ProvingKey<Bn254> {
        &self.proving_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.proving_key.vk
    }
}
