use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;

use crate::key::EncryptionKey;

/// AES-GCM nonce length in bytes. The envelope starts with the nonce.
pub const NONCE_LEN: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("ciphertext is not valid base64")]
    InvalidEncoding,
    #[error("ciphertext too short ({len} bytes)")]
    Truncated { len: usize },
    #[error("authentication failed: wrong key or corrupted ciphertext")]
    AuthenticationFailed,
    #[error("decrypted payload is not valid utf-8")]
    InvalidUtf8,
    #[error("cipher failure: {reason}")]
    Internal { reason: String },
}

/// Encrypt a string under the given key.
///
/// A fresh random nonce is drawn for every call, so encrypting the same
/// plaintext twice yields different envelopes. The returned value is
/// `base64(nonce || ciphertext || tag)`.
pub fn encrypt(plaintext: &str, key: &EncryptionKey) -> Result<String, CipherError> {
    let cipher = build_cipher(key)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| CipherError::Internal {
            reason: format!("encrypt failed: {e}"),
        })?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + sealed.len());
    envelope.extend_from_slice(nonce.as_slice());
    envelope.extend_from_slice(&sealed);
    Ok(BASE64.encode(envelope))
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// Fails without returning any partial plaintext when the envelope is
/// malformed or the authentication tag does not verify.
pub fn decrypt(envelope: &str, key: &EncryptionKey) -> Result<String, CipherError> {
    let bytes = BASE64
        .decode(envelope.trim())
        .map_err(|_| CipherError::InvalidEncoding)?;

    if bytes.len() < NONCE_LEN {
        return Err(CipherError::Truncated { len: bytes.len() });
    }
    let (nonce, sealed) = bytes.split_at(NONCE_LEN);

    let cipher = build_cipher(key)?;
    let plain = cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CipherError::AuthenticationFailed)?;

    String::from_utf8(plain).map_err(|_| CipherError::InvalidUtf8)
}

fn build_cipher(key: &EncryptionKey) -> Result<Aes256Gcm, CipherError> {
    // Cannot fail for a 32-byte key, but propagate rather than assume.
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|e| CipherError::Internal {
        reason: format!("cipher init failed: {e}"),
    })
}
