//! Ed25519 key material in the exchange's raw encoding.
//!
//! The exchange hands out keys as base64 of the raw 32-byte seed (private)
//! and the raw 32-byte point (public). Both are wrapped in their fixed DER
//! headers and loaded as PKCS#8 / SPKI documents, so a malformed key fails
//! the same way a malformed DER file would.

use crate::core::errors::ExchangeError;
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use zeroize::Zeroize;

pub const KEY_LENGTH: usize = 32;

/// ASN.1 header of an Ed25519 PKCS#8 v1 private key with a 32-byte seed
pub const PKCS8_ED25519_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// ASN.1 header of an Ed25519 SubjectPublicKeyInfo
pub const SPKI_ED25519_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

fn decode_b64(encoded: &str, what: &str) -> Result<Vec<u8>, ExchangeError> {
    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid {} encoding: {}", what, e)))
}

/// Decode a base64 public key and check it is a 32-byte point
fn decode_public_point(public_b64: &str) -> Result<Vec<u8>, ExchangeError> {
    let point = decode_b64(public_b64, "public key")?;
    if point.len() != KEY_LENGTH {
        return Err(ExchangeError::AuthError(format!(
            "Public key must be {} bytes, got {}",
            KEY_LENGTH,
            point.len()
        )));
    }
    Ok(point)
}

fn spki_der(point: &[u8]) -> Vec<u8> {
    let mut der = Vec::with_capacity(SPKI_ED25519_PREFIX.len() + point.len());
    der.extend_from_slice(&SPKI_ED25519_PREFIX);
    der.extend_from_slice(point);
    der
}

/// Private key capable of signing
#[derive(Clone)]
pub struct PrivateKeyHandle {
    signing_key: SigningKey,
}

impl PrivateKeyHandle {
    /// Load from a base64 seed. Only the first 32 decoded bytes are used.
    pub fn from_base64(seed_b64: &str) -> Result<Self, ExchangeError> {
        let mut decoded = decode_b64(seed_b64, "private key")?;
        if decoded.len() < KEY_LENGTH {
            let len = decoded.len();
            decoded.zeroize();
            return Err(ExchangeError::AuthError(format!(
                "Private key must decode to at least {} bytes, got {}",
                KEY_LENGTH, len
            )));
        }

        let result = Self::from_seed(&decoded[..KEY_LENGTH]);
        decoded.zeroize();
        result
    }

    /// Load from exactly 32 raw seed bytes
    pub fn from_seed(seed: &[u8]) -> Result<Self, ExchangeError> {
        if seed.len() != KEY_LENGTH {
            return Err(ExchangeError::AuthError(format!(
                "Private key seed must be {} bytes, got {}",
                KEY_LENGTH,
                seed.len()
            )));
        }

        let mut der = Vec::with_capacity(PKCS8_ED25519_PREFIX.len() + KEY_LENGTH);
        der.extend_from_slice(&PKCS8_ED25519_PREFIX);
        der.extend_from_slice(seed);

        let loaded = SigningKey::from_pkcs8_der(&der);
        der.zeroize();

        let signing_key = loaded.map_err(|e| {
            ExchangeError::AuthError(format!("Failed to load PKCS#8 private key: {}", e))
        })?;
        Ok(Self { signing_key })
    }

    /// Public key derived from this private key
    pub fn public_key(&self) -> PublicKeyHandle {
        PublicKeyHandle {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Pure Ed25519 signature over `message`
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyHandle")
            .field("public_key", &self.public_key().to_base64())
            .finish_non_exhaustive()
    }
}

/// Public key capable of verifying
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKeyHandle {
    verifying_key: VerifyingKey,
}

impl PublicKeyHandle {
    /// Load from a base64 raw 32-byte point
    pub fn from_base64(public_b64: &str) -> Result<Self, ExchangeError> {
        let point = decode_public_point(public_b64)?;
        Self::from_raw(&point)
    }

    pub fn from_raw(point: &[u8]) -> Result<Self, ExchangeError> {
        if point.len() != KEY_LENGTH {
            return Err(ExchangeError::AuthError(format!(
                "Public key must be {} bytes, got {}",
                KEY_LENGTH,
                point.len()
            )));
        }

        let verifying_key = VerifyingKey::from_public_key_der(&spki_der(point))
            .map_err(|e| ExchangeError::AuthError(format!("Failed to load SPKI public key: {}", e)))?;
        Ok(Self { verifying_key })
    }

    /// Canonical SPKI DER export, used to compare keys
    pub fn to_spki_der(&self) -> Result<Vec<u8>, ExchangeError> {
        self.verifying_key
            .to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| ExchangeError::AuthError(format!("Failed to export public key: {}", e)))
    }

    pub fn to_bytes(&self) -> [u8; KEY_LENGTH] {
        self.verifying_key.to_bytes()
    }

    /// Raw point, base64-encoded as sent in `X-API-Key`
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.verifying_key.to_bytes())
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.verifying_key.verify(message, signature).is_ok()
    }
}

impl fmt::Debug for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKeyHandle").field(&self.to_base64()).finish()
    }
}

/// A private key together with the public key it was issued with
#[derive(Debug, Clone)]
pub struct KeyPair {
    private_key: PrivateKeyHandle,
    public_key: PublicKeyHandle,
}

impl KeyPair {
    /// Load and cross-check both halves.
    ///
    /// Fails with [`ExchangeError::InvalidKeyPair`] when the supplied public
    /// key is not the one derived from the private key. The supplied key is
    /// compared as SPKI bytes and never decompressed, so a 32-byte value that
    /// is not a curve point is a mismatch like any other.
    pub fn from_base64(private_b64: &str, public_b64: &str) -> Result<Self, ExchangeError> {
        let private_key = PrivateKeyHandle::from_base64(private_b64)?;
        let supplied = spki_der(&decode_public_point(public_b64)?);

        let public_key = private_key.public_key();
        if public_key.to_spki_der()? != supplied {
            return Err(ExchangeError::InvalidKeyPair(
                "public key does not match the private key".to_string(),
            ));
        }

        Ok(Self {
            private_key,
            public_key,
        })
    }

    pub fn private_key(&self) -> &PrivateKeyHandle {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKeyHandle {
        &self.public_key
    }
}
