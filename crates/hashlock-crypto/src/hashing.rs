use hashlock_core::HashAlgorithm;
use sha2::{Digest, Sha256};

/// 32-byte digest.
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash arbitrary data using SHA-256.
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hash with the given algorithm.
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Hash {
    match algorithm {
        HashAlgorithm::Sha256 => sha256(data),
        HashAlgorithm::Blake3 => hash(data),
    }
}
