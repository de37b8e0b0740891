//! Verification orchestrator.
//!
//! One call is a single pass with no retries:
//! 1. resolve keys for the phone number (none means `NotSupported`)
//! 2. expand the message into variants
//! 3. derive one hash per (key, variant), keys outer, variants inner
//! 4. submit the whole batch in one request
//! 5. map the submission status to `Verified` or `Error`
//!
//! A failure anywhere after step 1 is an error, never `NotSupported`, and a
//! derivation failure means nothing is submitted.

use std::sync::Arc;

use tracing::{debug, info, warn};
use vsms_crypto::{agree, MessageHashDeriver};

use crate::config::VerifiedSmsConfig;
use crate::errors::VerifyError;
use crate::resolver::KeyResolver;
use crate::services::{HashSubmissionService, KeyLookupService};
use crate::types::{Agent, MessageSubmission, VerificationOutcome};
use crate::variants;

pub struct VerificationOrchestrator {
    resolver: KeyResolver,
    submitter: Arc<dyn HashSubmissionService>,
    deriver: MessageHashDeriver,
}

impl VerificationOrchestrator {
    /// Orchestrator with default 32-byte hashes.
    pub fn new(
        lookup: Arc<dyn KeyLookupService>,
        submitter: Arc<dyn HashSubmissionService>,
    ) -> Self {
        Self {
            resolver: KeyResolver::new(lookup),
            submitter,
            deriver: MessageHashDeriver::default(),
        }
    }

    /// Validate `config` and apply its hash length.
    pub fn from_config(
        config: &VerifiedSmsConfig,
        lookup: Arc<dyn KeyLookupService>,
        submitter: Arc<dyn HashSubmissionService>,
    ) -> Result<Self, VerifyError> {
        config.validate()?;
        Ok(Self::new(lookup, submitter).with_deriver(config.hash_deriver()))
    }

    pub fn with_deriver(mut self, deriver: MessageHashDeriver) -> Self {
        self.deriver = deriver;
        self
    }

    /// Public keys registered for `phone_number`.
    pub async fn get_public_keys_for_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Vec<String>, VerifyError> {
        self.resolver.resolve(phone_number).await
    }

    /// Build the submission batch for `message` without any network I/O.
    ///
    /// The first failing (key, variant) pair aborts the whole batch.
    pub fn derive_submissions(
        &self,
        public_keys: &[String],
        agent: &Agent,
        message: &str,
    ) -> Result<Vec<MessageSubmission>, VerifyError> {
        let variants = variants::expand(message);
        let mut submissions = Vec::with_capacity(public_keys.len() * variants.len());

        for (index, public_key) in public_keys.iter().enumerate() {
            let secret = agree(agent.private_key(), public_key).map_err(|e| {
                warn!("Key agreement failed for key #{}: {}", index, e);
                VerifyError::from(e)
            })?;

            for variant in &variants {
                let hash = self.deriver.derive(&secret, variant.as_bytes())?;
                submissions.push(MessageSubmission {
                    hash: hash.to_base64(),
                    agent_id: agent.id().to_string(),
                });
            }
        }

        debug!(
            "Derived {} hashes ({} keys x {} variants)",
            submissions.len(),
            public_keys.len(),
            variants.len()
        );
        Ok(submissions)
    }

    /// Run one verification and report the tri-state outcome.
    pub async fn verify(
        &self,
        phone_number: &str,
        agent: &Agent,
        message: &str,
    ) -> VerificationOutcome {
        match self.try_verify(phone_number, agent, message).await {
            Ok(true) => VerificationOutcome::Verified,
            Ok(false) => VerificationOutcome::NotSupported,
            Err(err) => {
                warn!("Verification for {} failed: {}", phone_number, err);
                VerificationOutcome::Error(err)
            }
        }
    }

    /// Mark a message as verified for `phone_number`.
    ///
    /// `Ok(false)` means the recipient's device does not take part in
    /// verified SMS; an error means no definitive answer was reached.
    pub async fn mark_as_verified(
        &self,
        phone_number: &str,
        agent: &Agent,
        message: &str,
    ) -> Result<bool, VerifyError> {
        self.verify(phone_number, agent, message).await.into_result()
    }

    async fn try_verify(
        &self,
        phone_number: &str,
        agent: &Agent,
        message: &str,
    ) -> Result<bool, VerifyError> {
        let public_keys = self.resolver.resolve(phone_number).await?;
        if public_keys.is_empty() {
            info!("No verified SMS keys registered for {}", phone_number);
            return Ok(false);
        }

        let submissions = self.derive_submissions(&public_keys, agent, message)?;

        debug!("Submitting {} hashes for {}", submissions.len(), phone_number);
        let status = self.submitter.batch_create(&submissions).await?;
        if !status.is_success() {
            return Err(VerifyError::BadStatus {
                service: "hash submission",
                status: status.to_string(),
            });
        }

        info!(
            "Marked message to {} as verified for agent {}",
            phone_number,
            agent.id()
        );
        Ok(true)
    }
}
