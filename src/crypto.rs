// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PIN-keyed envelope encryption.
//!
//! The relay's only shared secret is a short PIN known to the human operator
//! and the deploying script. Every payload crossing the ledger is sealed
//! with AES-256-GCM under a key derived from that PIN with
//! PBKDF2-HMAC-SHA256, and travels as the base64 text of
//! `salt(16) ‖ nonce(12) ‖ ciphertext`.
//!
//! The GCM authentication tag is the only integrity and PIN check: a wrong
//! PIN surfaces as [`DecryptionError`], never as garbage plaintext. There is
//! no separate checksum.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64ct::{Base64, Encoding};
use pbkdf2::pbkdf2_hmac;
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use thiserror::Error;

/// Salt prefix length of an envelope, in bytes.
pub const SALT_LENGTH: usize = 16;

/// AES-GCM nonce length, in bytes.
pub const NONCE_LENGTH: usize = 12;

/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derived key size (AES-256).
const KEY_LENGTH: usize = 32;

/// Opening an envelope failed: wrong PIN, truncated data, or a tampered
/// ciphertext. Indistinguishable on purpose.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("decryption failed: wrong PIN or corrupted envelope")]
pub struct DecryptionError;

/// Sealing a payload failed.
#[derive(Debug, Error)]
#[error("encryption failed")]
pub struct EncryptionError;

/// Derive the 256-bit envelope key from a PIN and a per-envelope salt.
pub fn derive_key(pin: &str, salt: &[u8]) -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(pin.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Seal `plaintext` under the PIN.
///
/// Draws a fresh salt and nonce from the OS RNG on every call, so repeated
/// inputs never produce the same envelope. Returns the base64 text of
/// `salt ‖ nonce ‖ ciphertext`.
pub fn encrypt(plaintext: &[u8], pin: &str) -> Result<String, EncryptionError> {
    let mut salt = [0u8; SALT_LENGTH];
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let key = Key::<Aes256Gcm>::from(derive_key(pin, &salt));
    let cipher = Aes256Gcm::new(&key);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| EncryptionError)?;

    let mut envelope = Vec::with_capacity(SALT_LENGTH + NONCE_LENGTH + ciphertext.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(Base64::encode_string(&envelope))
}

/// Open an envelope with the PIN.
///
/// The authentication tag is the only validation a candidate PIN gets; a
/// mismatch or an envelope shorter than its fixed prefix is a
/// [`DecryptionError`].
pub fn decrypt(envelope: &[u8], pin: &str) -> Result<Vec<u8>, DecryptionError> {
    if envelope.len() < SALT_LENGTH + NONCE_LENGTH {
        return Err(DecryptionError);
    }
    let (salt, rest) = envelope.split_at(SALT_LENGTH);
    let (nonce, ciphertext) = rest.split_at(NONCE_LENGTH);

    let key = Key::<Aes256Gcm>::from(derive_key(pin, salt));
    let cipher = Aes256Gcm::new(&key);
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| DecryptionError)
}

/// Decode the textual form of an envelope back to raw bytes.
pub fn decode_envelope(text: &str) -> Result<Vec<u8>, DecryptionError> {
    Base64::decode_vec(text).map_err(|_| DecryptionError)
}
