//! Configuration for verified SMS.
//!
//! Endpoints, scope, curve and hash length live here instead of in
//! constants so the orchestrator can be pointed at any provider or a mock.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vsms_crypto::hash::MAX_HASH_LEN;
use vsms_crypto::{MessageHashDeriver, NamedCurve};

use crate::errors::VerifyError;

pub const DEFAULT_LOOKUP_URL: &str =
    "https://verifiedsms.googleapis.com/v1/enabledUserKeys:batchGet";
pub const DEFAULT_SUBMIT_URL: &str = "https://verifiedsms.googleapis.com/v1/messages:batchCreate";
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/verifiedsms";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSmsConfig {
    /// Endpoint resolving phone numbers to device public keys
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,

    /// Endpoint accepting message hash batches
    #[serde(default = "default_submit_url")]
    pub submit_url: String,

    /// OAuth2 scope requested for the service account
    #[serde(default = "default_scope")]
    pub scope: String,

    /// OAuth2 token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Curve identifier; only P-384 is supported
    #[serde(default = "default_curve")]
    pub curve: String,

    /// Message hash length in bytes
    #[serde(default = "default_hash_len")]
    pub hash_len: usize,

    /// User-Agent sent on every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for VerifiedSmsConfig {
    fn default() -> Self {
        Self {
            lookup_url: default_lookup_url(),
            submit_url: default_submit_url(),
            scope: default_scope(),
            token_url: default_token_url(),
            curve: default_curve(),
            hash_len: default_hash_len(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

impl VerifiedSmsConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, VerifyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, VerifyError> {
        let config: Self =
            toml::from_str(content).map_err(|e| VerifyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `VSMS_*` environment variables.
    pub fn from_env() -> Result<Self, VerifyError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), VerifyError> {
        if let Some(url) = var("VSMS_LOOKUP_URL") {
            self.lookup_url = url;
        }
        if let Some(url) = var("VSMS_SUBMIT_URL") {
            self.submit_url = url;
        }
        if let Some(scope) = var("VSMS_SCOPE") {
            self.scope = scope;
        }
        if let Some(url) = var("VSMS_TOKEN_URL") {
            self.token_url = url;
        }
        if let Some(curve) = var("VSMS_CURVE") {
            self.curve = curve;
        }
        if let Some(len) = var("VSMS_HASH_LEN") {
            self.hash_len = len
                .parse()
                .map_err(|_| VerifyError::Config(format!("VSMS_HASH_LEN: not a number: {len}")))?;
        }
        if let Some(agent) = var("VSMS_USER_AGENT") {
            self.user_agent = agent;
        }
        if let Some(secs) = var("VSMS_TIMEOUT_SECS") {
            self.timeout_secs = secs.parse().map_err(|_| {
                VerifyError::Config(format!("VSMS_TIMEOUT_SECS: not a number: {secs}"))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), VerifyError> {
        for (name, url) in [
            ("lookup_url", &self.lookup_url),
            ("submit_url", &self.submit_url),
            ("token_url", &self.token_url),
        ] {
            if url.trim().is_empty() {
                return Err(VerifyError::Config(format!("{name} must not be empty")));
            }
        }

        match NamedCurve::from_name(&self.curve) {
            Some(NamedCurve::P384) => {}
            _ => {
                return Err(VerifyError::Config(format!(
                    "unsupported curve {:?}, only secp384r1 is supported",
                    self.curve
                )))
            }
        }

        if self.hash_len == 0 || self.hash_len > MAX_HASH_LEN {
            return Err(VerifyError::Config(format!(
                "hash_len must be between 1 and {MAX_HASH_LEN}, got {}",
                self.hash_len
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn hash_deriver(&self) -> MessageHashDeriver {
        MessageHashDeriver::with_output_len(self.hash_len)
    }
}

fn default_lookup_url() -> String {
    DEFAULT_LOOKUP_URL.to_string()
}

fn default_submit_url() -> String {
    DEFAULT_SUBMIT_URL.to_string()
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_curve() -> String {
    "secp384r1".to_string()
}

fn default_hash_len() -> usize {
    32
}

fn default_user_agent() -> String {
    format!("verified-sms/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    30
}
