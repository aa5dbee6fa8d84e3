use ed25519_dalek::Signer;
use hashlock_core::{Address, SwapId};

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

/// Domain separator for instant-refund consent.
pub const INSTANT_REFUND_DOMAIN: &[u8] = b"hashlock/instant-refund/v1";

/// Ed25519 signature (64 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    inner: ed25519_dalek::Signature,
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        self.inner.to_bytes()
    }

    /// Create from raw bytes (64 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_arr: [u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidInput(format!("signature must be 64 bytes, got {}", bytes.len()))
        })?;
        let inner = ed25519_dalek::Signature::from_bytes(&bytes_arr);
        Ok(Self { inner })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

/// Sign a message using Ed25519.
pub fn sign(message: &[u8], keypair: &KeyPair) -> Signature {
    let sig = keypair.signing_key().sign(message);
    Signature { inner: sig }
}

/// Verify an Ed25519 signature.
pub fn verify(message: &[u8], signature: &Signature, pubkey: &PublicKey) -> Result<(), CryptoError> {
    pubkey
        .verifying_key()
        .verify_strict(message, &signature.inner)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}

/// Bytes a redeemer signs to waive their claim: domain ‖ swap id.
pub fn instant_refund_payload(swap_id: &SwapId) -> Vec<u8> {
    let mut payload = Vec::with_capacity(INSTANT_REFUND_DOMAIN.len() + 32);
    payload.extend_from_slice(INSTANT_REFUND_DOMAIN);
    payload.extend_from_slice(swap_id.as_bytes());
    payload
}

/// Produce the redeemer's consent to an instant refund of `swap_id`.
pub fn sign_instant_refund(swap_id: &SwapId, redeemer: &KeyPair) -> Signature {
    sign(&instant_refund_payload(swap_id), redeemer)
}

/// Check that `signature` is `redeemer`'s consent to refund `swap_id`.
pub fn verify_instant_refund(
    swap_id: &SwapId,
    signature: &Signature,
    redeemer: &Address,
) -> Result<(), CryptoError> {
    let pubkey = PublicKey::from_address(redeemer)?;
    verify(&instant_refund_payload(swap_id), signature, &pubkey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_roundtrip() {
        let kp = KeyPair::generate();
        let message = b"hello hashlock";
        let sig = sign(message, &kp);
        assert!(verify(message, &sig, &kp.public_key()).is_ok());
    }

    #[test]
    fn test_verify_wrong_message_fails() {
        let kp = KeyPair::generate();
        let sig = sign(b"correct message", &kp);
        assert!(verify(b"wrong message", &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn test_signature_hex_roundtrip() {
        let kp = KeyPair::generate();
        let sig = sign(b"test", &kp);
        let hex_str = sig.to_hex();
        assert_eq!(hex_str.len(), 128);
        assert_eq!(Signature::from_hex(&hex_str).unwrap(), sig);
    }

    #[test]
    fn test_signature_from_invalid_bytes() {
        assert!(Signature::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_instant_refund_payload_layout() {
        let id = SwapId::from_bytes([9u8; 32]);
        let payload = instant_refund_payload(&id);
        assert!(payload.starts_with(INSTANT_REFUND_DOMAIN));
        assert_eq!(&payload[INSTANT_REFUND_DOMAIN.len()..], &[9u8; 32]);
    }

    #[test]
    fn test_instant_refund_consent() {
        let redeemer = KeyPair::generate();
        let id = SwapId::from_bytes([1u8; 32]);
        let sig = sign_instant_refund(&id, &redeemer);
        assert!(verify_instant_refund(&id, &sig, &redeemer.address()).is_ok());
    }

    #[test]
    fn test_instant_refund_consent_bound_to_swap() {
        let redeemer = KeyPair::generate();
        let sig = sign_instant_refund(&SwapId::from_bytes([1u8; 32]), &redeemer);
        let other = SwapId::from_bytes([2u8; 32]);
        assert!(matches!(
            verify_instant_refund(&other, &sig, &redeemer.address()),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_instant_refund_wrong_signer() {
        let redeemer = KeyPair::generate();
        let intruder = KeyPair::generate();
        let id = SwapId::from_bytes([1u8; 32]);
        let sig = sign_instant_refund(&id, &intruder);
        assert!(verify_instant_refund(&id, &sig, &redeemer.address()).is_err());
    }

    #[test]
    fn test_plain_signature_over_id_rejected() {
        let redeemer = KeyPair::generate();
        let id = SwapId::from_bytes([1u8; 32]);
        let sig = sign(id.as_bytes(), &redeemer);
        assert!(verify_instant_refund(&id, &sig, &redeemer.address()).is_err());
    }
}
