use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Fixed key size required by AES-256-GCM.
pub const KEY_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("encrypt_key must be valid base64")]
    InvalidEncoding,
    #[error("encrypt_key must decode to exactly 32 bytes, got {actual}")]
    InvalidLength { actual: usize },
}

/// 256-bit symmetric key used for encryption at rest.
///
/// Construction is the only validation gate: any `EncryptionKey` in hand is
/// guaranteed to be exactly 32 decoded bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// Parse a standard-base64 key string, trimming surrounding whitespace.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let decoded = BASE64
            .decode(encoded.trim())
            .map_err(|_| KeyError::InvalidEncoding)?;

        if decoded.len() != KEY_LEN {
            return Err(KeyError::InvalidLength {
                actual: decoded.len(),
            });
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Generate a fresh random key from the OS entropy source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

// Never reveal key bytes, even in debug output.
impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

/// Pure validation used before a key string is accepted into config.
pub fn validate(encoded: &str) -> Result<(), KeyError> {
    EncryptionKey::from_base64(encoded).map(|_| ())
}
