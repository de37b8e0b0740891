//! Recipient public key decoding.
//!
//! Keys arrive as standard base64 of a DER `SubjectPublicKeyInfo` carrying the
//! `id-ecPublicKey` algorithm and a named-curve parameter. Decoding does not
//! check the point against any curve; that is the job of [`crate::agreement`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use spki::der::Decode;
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};

/// `id-ecPublicKey` (RFC 5480).
const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

const OID_P256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const OID_P384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const OID_P521: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");
const OID_SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

/// Error type for public key decoding.
#[derive(Debug, thiserror::Error)]
pub enum PublicKeyError {
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("invalid public key container: {0}")]
    InvalidContainer(String),
    #[error("unsupported public key algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Named elliptic curves a recipient key may claim to live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    P256,
    P384,
    P521,
    Secp256k1,
}

impl NamedCurve {
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        [
            (OID_P256, Self::P256),
            (OID_P384, Self::P384),
            (OID_P521, Self::P521),
            (OID_SECP256K1, Self::Secp256k1),
        ]
        .into_iter()
        .find(|(known, _)| known == oid)
        .map(|(_, curve)| curve)
    }

    /// Parse a curve identifier as it appears in configuration.
    ///
    /// Accepts both the SEC names (`secp384r1`) and the NIST names (`P-384`),
    /// case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "p-256" | "p256" | "secp256r1" | "prime256v1" => Some(Self::P256),
            "p-384" | "p384" | "secp384r1" => Some(Self::P384),
            "p-521" | "p521" | "secp521r1" => Some(Self::P521),
            "secp256k1" => Some(Self::Secp256k1),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
            Self::Secp256k1 => "secp256k1",
        }
    }
}

/// An EC public key lifted out of its container, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPublicKey {
    curve_oid: ObjectIdentifier,
    point: Vec<u8>,
}

impl DecodedPublicKey {
    /// Decode base64 SubjectPublicKeyInfo.
    pub fn from_base64(encoded: &str) -> Result<Self, PublicKeyError> {
        let der = STANDARD.decode(encoded.trim())?;
        Self::from_der(&der)
    }

    /// Decode a DER SubjectPublicKeyInfo.
    pub fn from_der(der: &[u8]) -> Result<Self, PublicKeyError> {
        let info = SubjectPublicKeyInfoRef::from_der(der)
            .map_err(|e| PublicKeyError::InvalidContainer(e.to_string()))?;

        if info.algorithm.oid != ID_EC_PUBLIC_KEY {
            return Err(PublicKeyError::UnsupportedAlgorithm(
                info.algorithm.oid.to_string(),
            ));
        }

        let curve_oid = info
            .algorithm
            .parameters_oid()
            .map_err(|e| PublicKeyError::InvalidContainer(format!("missing curve: {}", e)))?;

        let point = info
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| PublicKeyError::InvalidContainer("unaligned key bit string".into()))?
            .to_vec();

        Ok(Self { curve_oid, point })
    }

    /// The curve the container names, if it is one we know.
    pub fn curve(&self) -> Option<NamedCurve> {
        NamedCurve::from_oid(&self.curve_oid)
    }

    /// Human readable curve name, falling back to the dotted OID.
    pub fn curve_name(&self) -> String {
        match self.curve() {
            Some(curve) => curve.name().to_string(),
            None => self.curve_oid.to_string(),
        }
    }

    /// SEC1 encoded point bytes.
    pub fn point(&self) -> &[u8] {
        &self.point
    }

    /// Hex x and y coordinates read straight from the SEC1 encoding.
    ///
    /// Compressed points only carry x.
    pub fn coordinates(&self) -> (String, Option<String>) {
        match self.point.split_first() {
            Some((0x04, rest)) if rest.len() % 2 == 0 => {
                let (x, y) = rest.split_at(rest.len() / 2);
                (hex::encode(x), Some(hex::encode(y)))
            }
            Some((0x02 | 0x03, rest)) => (hex::encode(rest), None),
            _ => (hex::encode(&self.point), None),
        }
    }
}
