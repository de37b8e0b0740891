//! Error types for verified SMS.
//!
//! Every failure is returned to the caller. [`VerifyError::kind`] reduces an
//! error to the coarse class callers use for retry decisions, and
//! [`VerifyError::metadata`] carries structured diagnostics where there are any.

use std::collections::BTreeMap;

use thiserror::Error;
use vsms_crypto::{AgreementError, HashError, MessageHashError, PublicKeyError};

/// Coarse classification of a [`VerifyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input can never succeed, e.g. a public key that is not on the curve.
    PreconditionFailed,
    /// Network failure or non-2xx response from a collaborator.
    Transport,
    /// Malformed base64, key container or JSON.
    Decoding,
    /// Credentials could not be loaded or a token could not be obtained.
    Unauthorized,
    /// Invalid configuration.
    Config,
    /// Anything else.
    Internal,
}

/// Unified error type for verified SMS operations.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Public key decoding failed
    #[error("public key error: {0}")]
    PublicKey(#[from] PublicKeyError),

    /// Key agreement failed
    #[error("agreement error: {0}")]
    Agreement(AgreementError),

    /// Hash derivation failed
    #[error("hash error: {0}")]
    Hash(#[from] HashError),

    /// Request never got a response
    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    /// Collaborator answered outside the 2xx range
    #[error("bad response from {service}: {status}")]
    BadStatus {
        service: &'static str,
        status: String,
    },

    /// Response or input could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Credential or token failure
    #[error("auth error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AgreementError> for VerifyError {
    fn from(err: AgreementError) -> Self {
        match err {
            AgreementError::PublicKey(e) => VerifyError::PublicKey(e),
            other => VerifyError::Agreement(other),
        }
    }
}

impl From<MessageHashError> for VerifyError {
    fn from(err: MessageHashError) -> Self {
        match err {
            MessageHashError::Agreement(e) => e.into(),
            MessageHashError::Hash(e) => VerifyError::Hash(e),
        }
    }
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::Agreement(AgreementError::NotOnCurve { .. }) => {
                ErrorKind::PreconditionFailed
            }
            VerifyError::Agreement(AgreementError::InvalidPoint) => ErrorKind::Decoding,
            VerifyError::Agreement(AgreementError::InvalidPrivateKey(_)) => ErrorKind::Config,
            VerifyError::Agreement(AgreementError::PublicKey(_)) => ErrorKind::Decoding,
            VerifyError::PublicKey(_) | VerifyError::Decode(_) | VerifyError::Json(_) => {
                ErrorKind::Decoding
            }
            VerifyError::Transport { .. } | VerifyError::BadStatus { .. } => ErrorKind::Transport,
            VerifyError::Auth(_) => ErrorKind::Unauthorized,
            VerifyError::Config(_) => ErrorKind::Config,
            VerifyError::Hash(_) | VerifyError::Io(_) => ErrorKind::Internal,
        }
    }

    /// Structured diagnostics. Empty for most errors.
    pub fn metadata(&self) -> BTreeMap<&'static str, String> {
        let mut meta = BTreeMap::new();
        match self {
            VerifyError::Agreement(AgreementError::NotOnCurve {
                x,
                y,
                key_curve,
                expected_curve,
            }) => {
                meta.insert("public_key.x", x.clone());
                if let Some(y) = y {
                    meta.insert("public_key.y", y.clone());
                }
                meta.insert("public_key.curve_name", key_curve.clone());
                meta.insert("expected_curve", expected_curve.to_string());
            }
            VerifyError::Transport { service, .. } | VerifyError::BadStatus { service, .. } => {
                meta.insert("service", service.to_string());
            }
            _ => {}
        }
        meta
    }

    /// Whether a caller-level retry could change the result.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
