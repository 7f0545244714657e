// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session signing identity.
//!
//! The very first relay message carries the serialized secret key of the
//! ephemeral address; the session reconstructs the keypair from it and
//! signs every reply transaction with it. The key lives in memory for the
//! life of the session and is never persisted or logged.

use std::fmt;

use base64ct::{Base64, Encoding};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

use crate::error::RelayError;

/// Ed25519 keypair recovered from the bootstrap message.
pub struct SessionKeypair {
    signing_key: SigningKey,
}

impl SessionKeypair {
    /// Rebuild the keypair from the base64 text of a 32-byte secret key.
    pub fn from_base64_secret(encoded: &str) -> Result<Self, RelayError> {
        let bytes = Base64::decode_vec(encoded)
            .map_err(|_| RelayError::MalformedPayload("secret key is not valid base64".into()))?;
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| RelayError::MalformedPayload("secret key must be 32 bytes".into()))?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&secret),
        })
    }

    /// Sign arbitrary bytes with the session identity.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Public half of the session identity.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl fmt::Debug for SessionKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // secret bytes stay out of logs
        f.debug_struct("SessionKeypair")
            .field("public", &self.verifying_key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Verifier;

    fn encoded_secret() -> String {
        Base64::encode_string(&[42u8; 32])
    }

    #[test]
    fn recovered_keypair_signs_verifiably() {
        let keypair = SessionKeypair::from_base64_secret(&encoded_secret()).unwrap();
        let signature = keypair.sign(b"relay reply");
        keypair
            .verifying_key()
            .verify(b"relay reply", &signature)
            .unwrap();
    }

    #[test]
    fn wrong_length_secret_is_rejected() {
        let short = Base64::encode_string(&[1u8; 16]);
        assert!(matches!(
            SessionKeypair::from_base64_secret(&short),
            Err(RelayError::MalformedPayload(_))
        ));
    }

    #[test]
    fn invalid_base64_secret_is_rejected() {
        assert!(matches!(
            SessionKeypair::from_base64_secret("not*base64"),
            Err(RelayError::MalformedPayload(_))
        ));
    }

    #[test]
    fn debug_output_redacts_secret_material() {
        let keypair = SessionKeypair::from_base64_secret(&encoded_secret()).unwrap();
        let rendered = format!("{keypair:?}");
        assert!(rendered.starts_with("SessionKeypair"));
        assert!(rendered.contains("public"));
        assert!(!rendered.contains(&encoded_secret()));
    }
}
