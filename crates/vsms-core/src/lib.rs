//! Verified SMS core - sender-side message verification.
//!
//! This crate implements:
//! - Public key lookup for a recipient phone number
//! - Message variant expansion
//! - Per-device hash derivation and batched submission
//! - Configuration and error taxonomy
//! - HTTPS collaborators with service-account auth (feature `http`)

#![forbid(unsafe_code)]

// Verification flow
pub mod orchestrator;
pub mod resolver;
pub mod variants;

// Collaborator seams
pub mod services;

// Supporting modules
pub mod config;
pub mod errors;
pub mod types;
pub mod harness;

// Optional HTTPS implementations
#[cfg(feature = "http")]
pub mod auth;
#[cfg(feature = "http")]
pub mod http;

pub use config::VerifiedSmsConfig;
pub use errors::{ErrorKind, VerifyError};
pub use orchestrator::VerificationOrchestrator;
pub use resolver::KeyResolver;
pub use services::{
    Authenticator, HashSubmissionService, KeyLookupService, StaticTokenAuthenticator,
};
pub use types::{Agent, MessageSubmission, SubmissionStatus, UserKey, VerificationOutcome};

#[cfg(feature = "http")]
pub use auth::{ServiceAccountAuthenticator, ServiceAccountKey};
#[cfg(feature = "http")]
pub use http::{VerifiedSms, VerifiedSmsClient};
