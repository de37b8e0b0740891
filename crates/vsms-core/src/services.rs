//! Collaborator capabilities.
//!
//! The orchestrator only sees these traits, so it runs the same against the
//! HTTPS clients in [`crate::http`] and the fakes in [`crate::harness`].

use async_trait::async_trait;

use crate::errors::VerifyError;
use crate::types::{MessageSubmission, SubmissionStatus, UserKey};

/// Phone number to public key lookup.
#[async_trait]
pub trait KeyLookupService: Send + Sync {
    /// Fetch keys registered for any of `phone_numbers`.
    async fn batch_get_keys(&self, phone_numbers: &[String]) -> Result<Vec<UserKey>, VerifyError>;
}

/// Hash batch submission.
#[async_trait]
pub trait HashSubmissionService: Send + Sync {
    /// Submit one batch. A response of any status is `Ok`; the caller
    /// decides what counts as success.
    async fn batch_create(
        &self,
        messages: &[MessageSubmission],
    ) -> Result<SubmissionStatus, VerifyError>;
}

/// Source of the `Authorization` header value.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authorization(&self) -> Result<String, VerifyError>;
}

/// Authenticator for a pre-issued bearer token.
#[derive(Clone)]
pub struct StaticTokenAuthenticator {
    token: String,
}

impl StaticTokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticTokenAuthenticator(..)")
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authorization(&self) -> Result<String, VerifyError> {
        Ok(format!("Bearer {}", self.token))
    }
}
