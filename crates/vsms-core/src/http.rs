#![cfg(feature = "http")]

//! HTTPS JSON collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::{ServiceAccountAuthenticator, ServiceAccountKey};
use crate::config::VerifiedSmsConfig;
use crate::errors::VerifyError;
use crate::orchestrator::VerificationOrchestrator;
use crate::services::{Authenticator, HashSubmissionService, KeyLookupService};
use crate::types::{
    Agent, BatchCreateRequest, BatchGetKeysRequest, BatchGetKeysResponse, MessageSubmission,
    SubmissionStatus, UserKey, VerificationOutcome,
};

const CONTENT_TYPE_JSON: &str = "application/json";
const LOOKUP_SERVICE: &str = "key lookup";
const SUBMIT_SERVICE: &str = "hash submission";

/// Client for the key lookup and hash submission endpoints.
#[derive(Clone)]
pub struct VerifiedSmsClient {
    client: reqwest::Client,
    lookup_url: String,
    submit_url: String,
    user_agent: String,
    auth: Arc<dyn Authenticator>,
}

impl VerifiedSmsClient {
    pub fn new(config: &VerifiedSmsConfig, auth: Arc<dyn Authenticator>) -> Result<Self, VerifyError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .map_err(|e| VerifyError::Config(e.to_string()))?;

        Ok(Self {
            client,
            lookup_url: config.lookup_url.clone(),
            submit_url: config.submit_url.clone(),
            user_agent: config.user_agent.clone(),
            auth,
        })
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        service: &'static str,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, VerifyError> {
        let body = serde_json::to_vec(body)?;
        let authorization = self.auth.authorization().await?;

        debug!("POST {} ({} bytes)", url, body.len());
        self.client
            .post(url)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(USER_AGENT, &self.user_agent)
            .header(AUTHORIZATION, authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| VerifyError::Transport {
                service,
                message: e.to_string(),
            })
    }
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[async_trait]
impl KeyLookupService for VerifiedSmsClient {
    async fn batch_get_keys(&self, phone_numbers: &[String]) -> Result<Vec<UserKey>, VerifyError> {
        let request = BatchGetKeysRequest {
            phone_numbers: phone_numbers.to_vec(),
        };
        let resp = self
            .post_json(LOOKUP_SERVICE, &self.lookup_url, &request)
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Key lookup returned {}", status);
            return Err(VerifyError::BadStatus {
                service: LOOKUP_SERVICE,
                status: status_text(status),
            });
        }

        let body = resp.bytes().await.map_err(|e| VerifyError::Transport {
            service: LOOKUP_SERVICE,
            message: e.to_string(),
        })?;
        if body.is_empty() {
            return Ok(Vec::new());
        }

        let parsed: BatchGetKeysResponse = serde_json::from_slice(&body)
            .map_err(|e| VerifyError::Decode(format!("key lookup response: {}", e)))?;
        Ok(parsed.user_keys)
    }
}

#[async_trait]
impl HashSubmissionService for VerifiedSmsClient {
    async fn batch_create(
        &self,
        messages: &[MessageSubmission],
    ) -> Result<SubmissionStatus, VerifyError> {
        let request = BatchCreateRequest {
            messages: messages.to_vec(),
        };
        let resp = self
            .post_json(SUBMIT_SERVICE, &self.submit_url, &request)
            .await?;

        let status = resp.status();
        if !status.is_success() {
            debug!(
                "Hash submission rejected: status={} body={:?}",
                status,
                resp.text().await.ok()
            );
        }

        Ok(SubmissionStatus::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
        ))
    }
}

/// Ready-to-use sender: HTTPS collaborators behind a verification
/// orchestrator.
pub struct VerifiedSms {
    orchestrator: VerificationOrchestrator,
}

impl VerifiedSms {
    pub fn new(config: &VerifiedSmsConfig, auth: Arc<dyn Authenticator>) -> Result<Self, VerifyError> {
        let client = Arc::new(VerifiedSmsClient::new(config, auth)?);
        let orchestrator = VerificationOrchestrator::from_config(config, client.clone(), client)?;
        Ok(Self { orchestrator })
    }

    /// Authenticate as a service account.
    pub fn with_service_account(
        config: &VerifiedSmsConfig,
        key: ServiceAccountKey,
    ) -> Result<Self, VerifyError> {
        let auth = ServiceAccountAuthenticator::new(key, config)?;
        Self::new(config, Arc::new(auth))
    }

    pub async fn mark_as_verified(
        &self,
        phone_number: &str,
        agent: &Agent,
        message: &str,
    ) -> Result<bool, VerifyError> {
        self.orchestrator
            .mark_as_verified(phone_number, agent, message)
            .await
    }

    pub async fn verify(&self, phone_number: &str, agent: &Agent, message: &str) -> VerificationOutcome {
        self.orchestrator.verify(phone_number, agent, message).await
    }

    pub async fn get_public_keys_for_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Vec<String>, VerifyError> {
        self.orchestrator
            .get_public_keys_for_phone_number(phone_number)
            .await
    }

    pub fn orchestrator(&self) -> &VerificationOrchestrator {
        &self.orchestrator
    }
}
