//! Sender-side cryptography for verified SMS.
//!
//! A message hash is `HKDF-SHA256(ECDH(agent_key, device_key), message)`.
//! Only the hash ever leaves the sender.

#![forbid(unsafe_code)]

pub mod agreement;
pub mod hash;
pub mod public_key;

#[cfg(test)]
mod proptests;

pub use agreement::{agree, private_key_from_pem, AgreementError, SharedSecret};
pub use hash::{derive_message_hash, HashError, MessageHash, MessageHashDeriver};
pub use p384::SecretKey;
pub use public_key::{DecodedPublicKey, NamedCurve, PublicKeyError};

/// Error from the combined agree-then-derive step.
#[derive(Debug, thiserror::Error)]
pub enum MessageHashError {
    #[error(transparent)]
    Agreement(#[from] AgreementError),
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Hash `message` as sent by the holder of `private_key` to the device
/// owning `public_key_b64`.
pub fn message_hash(
    public_key_b64: &str,
    private_key: &SecretKey,
    message: &[u8],
) -> Result<MessageHash, MessageHashError> {
    message_hash_with(&MessageHashDeriver::default(), public_key_b64, private_key, message)
}

/// [`message_hash`] with an explicit deriver.
pub fn message_hash_with(
    deriver: &MessageHashDeriver,
    public_key_b64: &str,
    private_key: &SecretKey,
    message: &[u8],
) -> Result<MessageHash, MessageHashError> {
    let secret = agree(private_key, public_key_b64)?;
    Ok(deriver.derive(&secret, message)?)
}
