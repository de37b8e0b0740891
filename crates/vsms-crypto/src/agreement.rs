//! ECDH key agreement on P-384.
//!
//! The shared secret is the x-coordinate of `d * Q` as a big-endian integer
//! with leading zero bytes removed. Receivers hash that exact byte string, so
//! the stripping must stay.

use std::fmt;

use p384::ecdh::diffie_hellman;
use p384::elliptic_curve::sec1::FromEncodedPoint;
use p384::{EncodedPoint, PublicKey, SecretKey};
use pkcs8::DecodePrivateKey;
use zeroize::Zeroizing;

use crate::public_key::{DecodedPublicKey, NamedCurve, PublicKeyError};

/// The curve every agreement runs on.
pub const AGREEMENT_CURVE: NamedCurve = NamedCurve::P384;

/// Error type for key agreement.
#[derive(Debug, thiserror::Error)]
pub enum AgreementError {
    #[error(transparent)]
    PublicKey(#[from] PublicKeyError),
    #[error("invalid point encoding")]
    InvalidPoint,
    #[error("public key should be on curve {expected_curve} but is not (key curve {key_curve})")]
    NotOnCurve {
        x: String,
        y: Option<String>,
        key_curve: String,
        expected_curve: &'static str,
    },
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
}

/// ECDH output. Zeroized on drop and never printed.
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SharedSecret {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret({} bytes)", self.0.len())
    }
}

/// Load an agent private key from PKCS#8 or SEC1 PEM.
pub fn private_key_from_pem(pem: &str) -> Result<SecretKey, AgreementError> {
    SecretKey::from_pkcs8_pem(pem)
        .or_else(|_| SecretKey::from_sec1_pem(pem))
        .map_err(|e| AgreementError::InvalidPrivateKey(e.to_string()))
}

/// Check that a decoded key is a P-384 point before it is used for anything.
pub fn validate_on_curve(key: &DecodedPublicKey) -> Result<PublicKey, AgreementError> {
    let not_on_curve = || {
        let (x, y) = key.coordinates();
        AgreementError::NotOnCurve {
            x,
            y,
            key_curve: key.curve_name(),
            expected_curve: AGREEMENT_CURVE.name(),
        }
    };

    if key.curve() != Some(AGREEMENT_CURVE) {
        return Err(not_on_curve());
    }

    // Only the uncompressed SEC1 form is accepted
    if key.point().first() != Some(&0x04) {
        return Err(AgreementError::InvalidPoint);
    }

    let point = EncodedPoint::from_bytes(key.point()).map_err(|_| AgreementError::InvalidPoint)?;
    Option::<PublicKey>::from(PublicKey::from_encoded_point(&point)).ok_or_else(not_on_curve)
}

/// Agree on a secret with an already validated public key.
pub fn agree_with(private_key: &SecretKey, public_key: &PublicKey) -> SharedSecret {
    let shared = diffie_hellman(private_key.to_nonzero_scalar(), public_key.as_affine());
    let x = shared.raw_secret_bytes().as_slice();
    let start = x.iter().position(|b| *b != 0).unwrap_or(x.len());
    SharedSecret::from(x[start..].to_vec())
}

/// Decode, validate and agree in one step.
pub fn agree(private_key: &SecretKey, public_key_b64: &str) -> Result<SharedSecret, AgreementError> {
    let decoded = DecodedPublicKey::from_base64(public_key_b64)?;
    let public_key = validate_on_curve(&decoded)?;
    Ok(agree_with(private_key, &public_key))
}
