//! Message hash derivation.
//!
//! `hash = HKDF-SHA256(ikm = shared_secret, salt = none, info = message)`,
//! expanded to 32 bytes by default. The receiving device computes the same
//! value from its side of the agreement, so the output must be bit-exact.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hkdf::Hkdf;
use sha2::Sha256;

use crate::agreement::SharedSecret;

/// Default output length of a message hash.
pub const MESSAGE_HASH_LEN: usize = 32;

/// Largest output HKDF-SHA256 can expand to (255 blocks).
pub const MAX_HASH_LEN: usize = 255 * 32;

/// Error type for hash derivation.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("hkdf cannot expand to {0} bytes")]
    OutputLength(usize),
}

/// Keyed hash of one message variant.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MessageHash(Vec<u8>);

impl MessageHash {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Standard base64, the form submitted on the wire.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for MessageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageHash({})", hex::encode(&self.0))
    }
}

/// HKDF-SHA256 deriver with a fixed output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHashDeriver {
    output_len: usize,
}

impl Default for MessageHashDeriver {
    fn default() -> Self {
        Self {
            output_len: MESSAGE_HASH_LEN,
        }
    }
}

impl MessageHashDeriver {
    /// A deriver producing `output_len` bytes. Lengths HKDF cannot supply
    /// surface as an error from [`MessageHashDeriver::derive`].
    pub fn with_output_len(output_len: usize) -> Self {
        Self { output_len }
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    pub fn derive(&self, secret: &SharedSecret, message: &[u8]) -> Result<MessageHash, HashError> {
        let hk = Hkdf::<Sha256>::new(None, secret.as_bytes());

        let mut out = vec![0u8; self.output_len];
        hk.expand(message, &mut out)
            .map_err(|_| HashError::OutputLength(self.output_len))?;

        Ok(MessageHash(out))
    }
}

/// Derive a 32-byte message hash.
pub fn derive_message_hash(secret: &SharedSecret, message: &[u8]) -> Result<MessageHash, HashError> {
    MessageHashDeriver::default().derive(secret, message)
}
