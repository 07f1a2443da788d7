use std::hint::black_box;
use std::sync::Arc;

use ark_std::rand::{rngs::StdRng, SeedableRng};
use criterion::{criterion_group, criterion_main, Criterion};
use zkauth_crypto::{
    derive_commitment, setup_auth_keys, ProofProver, ProvingArtifacts, VerificationKey,
};

const FIXTURE_SEED: u64 = 0x7a6b_6175_7468;

fn fixture() -> (ProofProver, VerificationKey) {
    let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
    let (pk, vk) = setup_auth_keys(&mut rng).unwrap();
    let key = VerificationKey::from_verifying_key(&vk).unwrap();
    (ProofProver::new(Arc::new(ProvingArtifacts::new(pk))), key)
}

fn bench_commitment_derivation(c: &mut Criterion) {
    c.bench_function("commitment_derivation", |b| {
        b.iter(|| derive_commitment(black_box("mysecret"), black_box("n-001")))
    });
}

fn bench_proof_generation(c: &mut Criterion) {
    let (prover, _) = fixture();
    let commitment = derive_commitment("mysecret", "n-001").to_canonical();

    c.bench_function("proof_generation", |b| {
        b.iter(|| {
            prover
                .prove(black_box("mysecret"), black_box("n-001"), black_box(&commitment))
                .unwrap()
        })
    });
}

fn bench_proof_verification(c: &mut Criterion) {
    let (prover, key) = fixture();
    let commitment = derive_commitment("mysecret", "n-001").to_canonical();
    let bundle = prover.prove("mysecret", "n-001", &commitment).unwrap();

    c.bench_function("proof_verification", |b| {
        b.iter(|| {
            key.verify(black_box(&bundle.proof), black_box(&bundle.public_signals))
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_commitment_derivation,
    bench_proof_generation,
    bench_proof_verification
);
criterion_main!(benches);
