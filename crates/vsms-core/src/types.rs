//! Data model and wire shapes.

use std::fmt;

use serde::{Deserialize, Serialize};
use vsms_crypto::{private_key_from_pem, SecretKey};

use crate::errors::VerifyError;

/// The sending party. Its private key is used for every agreement.
#[derive(Clone)]
pub struct Agent {
    id: String,
    private_key: SecretKey,
}

impl Agent {
    pub fn new(id: impl Into<String>, private_key: SecretKey) -> Self {
        Self {
            id: id.into(),
            private_key,
        }
    }

    /// Build an agent from a PKCS#8 or SEC1 PEM private key.
    pub fn from_pem(id: impl Into<String>, pem: &str) -> Result<Self, VerifyError> {
        Ok(Self::new(id, private_key_from_pem(pem)?))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn private_key(&self) -> &SecretKey {
        &self.private_key
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Result of one verification call.
#[derive(Debug)]
pub enum VerificationOutcome {
    /// Hashes were accepted by the verification authority.
    Verified,
    /// No public key is registered for the phone number.
    NotSupported,
    /// No definitive answer could be reached.
    Error(VerifyError),
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified)
    }

    /// Collapse to the `(verified, error)` shape embedding callers expect.
    pub fn into_result(self) -> Result<bool, VerifyError> {
        match self {
            VerificationOutcome::Verified => Ok(true),
            VerificationOutcome::NotSupported => Ok(false),
            VerificationOutcome::Error(err) => Err(err),
        }
    }
}

/// Status line returned by the submission service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionStatus {
    pub code: u16,
    pub reason: String,
}

impl SubmissionStatus {
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200, "OK")
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.code)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.reason)
        }
    }
}

/// One `userKeys` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKey {
    pub phone_number: String,
    pub public_key: String,
}

/// One `messages` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSubmission {
    /// Base64 message hash
    pub hash: String,
    pub agent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetKeysRequest {
    pub phone_numbers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetKeysResponse {
    /// Omitted by the service when nothing matched.
    #[serde(default)]
    pub user_keys: Vec<UserKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCreateRequest {
    pub messages: Vec<MessageSubmission>,
}
