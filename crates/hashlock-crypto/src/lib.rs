pub mod error;
pub mod keys;
pub mod signing;
pub mod hashing;
pub mod hashlock;

pub use error::CryptoError;
pub use keys::{KeyPair, PublicKey};
pub use signing::{
    instant_refund_payload, sign, sign_instant_refund, verify, verify_instant_refund, Signature,
    INSTANT_REFUND_DOMAIN,
};
pub use hashing::{digest, hash, sha256};
pub use hashlock::{commitment, generate_secret, verify_secret};
