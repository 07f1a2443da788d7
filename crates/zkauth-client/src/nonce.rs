/// Bytes of randomness in a registration nonce.
pub const NONCE_BYTES: usize = 16;

/// A fresh hex-encoded registration nonce from the OS RNG.
pub fn generate_nonce() -> String {
    hex::encode(zkauth_crypto::random_bytes::<NONCE_BYTES>())
}
