#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod circuit;
pub mod commitment;
mod encoding;
pub mod field;
pub mod keys;
pub mod poseidon;
pub mod proof;
pub mod prover;
pub mod signals;
mod verify;

pub use circuit::{setup_auth_keys, AuthCircuit};
pub use commitment::{derive_commitment, nonce_to_field, secret_to_field};
pub use field::FieldElement;
pub use keys::{ProvingArtifacts, VerificationKey, VerificationKeyDocument};
pub use proof::{proof_digest, ProofDocument};
pub use prover::{ProofBundle, ProofProver};
pub use signals::PublicSignals;

/// File names written by `zk-keygen` and expected by the server and client.
pub const PROVING_KEY_FILE: &str = "auth.pk.bin";
pub const VERIFICATION_KEY_FILE: &str = "verification_key.json";
pub const VERIFICATION_KEY_HASH_FILE: &str = "auth.vk.hash";
pub const KEY_METADATA_FILE: &str = "auth.meta.json";

pub fn random_bytes<const N: usize>() -> [u8; N] {
    use rand::RngCore;
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use ark_bn254::Bn254;
    use ark_groth16::{ProvingKey, VerifyingKey};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use std::sync::{Arc, OnceLock};

    const FIXTURE_SEED: u64 = 0x7a6b_6175_7468;

    static KEYS: OnceLock<(Arc<ProvingArtifacts>, VerificationKey)> = OnceLock::new();

    fn fixture() -> &'static (Arc<ProvingArtifacts>, VerificationKey) {
        KEYS.get_or_init(|| {
            let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
            let (pk, vk) = setup_auth_keys(&mut rng).unwrap();
            let key = VerificationKey::from_verifying_key(&vk).unwrap();
            (Arc::new(ProvingArtifacts::new(pk)), key)
        })
    }

    pub fn test_keys() -> (&'static ProvingKey<Bn254>, &'static VerifyingKey<Bn254>) {
        let artifacts = &fixture().0;
        (artifacts.proving_key(), artifacts.verifying_key())
    }

    pub fn test_prover() -> ProofProver {
        ProofProver::new(fixture().0.clone())
    }

    pub fn test_verification_key() -> &'static VerificationKey {
        &fixture().1
    }
}
