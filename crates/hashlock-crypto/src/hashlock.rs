//! Secret commitments.
//!
//! A swap is locked under `digest(secret)`. Redemption reveals the secret,
//! which anyone can then read from the emitted event.

use hashlock_core::{HashAlgorithm, Secret, SecretHash};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::hashing::digest;

/// Commitment for `secret` under `algorithm`.
pub fn commitment(algorithm: HashAlgorithm, secret: &Secret) -> SecretHash {
    SecretHash::from_bytes(digest(algorithm, secret.as_bytes()))
}

/// Whether `secret` opens `expected`. Constant time in the digest comparison.
pub fn verify_secret(algorithm: HashAlgorithm, secret: &Secret, expected: &SecretHash) -> bool {
    let actual = digest(algorithm, secret.as_bytes());
    constant_time_eq::constant_time_eq_32(&actual, expected.as_bytes())
}

/// Draw a fresh 32-byte secret from OS entropy.
pub fn generate_secret() -> Secret {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Secret::from_bytes(bytes)
}
