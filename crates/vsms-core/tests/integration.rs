//! Integration tests for the verification flow.
//!
//! These run the orchestrator against the in-memory collaborators with
//! fixed key material, so every submitted hash is checked byte for byte.

use std::sync::Arc;

use vsms_core::{
    harness::{InMemoryKeyLookup, RecordingSubmitter},
    Agent, ErrorKind, SubmissionStatus, VerificationOrchestrator, VerificationOutcome,
    VerifiedSmsConfig, VerifyError,
};
use vsms_crypto::{message_hash, SecretKey};

const PHONE: &str = "+447700900001";
const OTHER_PHONE: &str = "+447700900002";
const AGENT_ID: &str = "sender-agent";

const AGENT_SCALAR: &str = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
const DEVICE_SPKI: &str = "MHYwEAYHKoZIzj0CAQYFK4EEACIDYgAEsgGDUNfjJVH6zy9hPF7Cb2faSS/qvRl2BWpyu3X5Fyw2SYX6tMGcjfJCglw5Joff5pKlTDo4ywrDULTU3BNH5jLobnwF1nIo6GzI2bG3VN8fZTX4w2xvJkk2xb3Dsd/l";
const DEVICE2_SPKI: &str = "MHYwEAYHKoZIzj0CAQYFK4EEACIDYgAEqrsPsGZqz88B+tUr/P1MK/LLPDSX3nOVDlgZth/mlQmHQcjEkUObNKBDHK/+W/m0wcjorgAB+fTcitgsWfNjnpbNbD1NsM7+wmw9YlF7N3YTcnQ/jordd7EAZPKr5eBQ";
const P256_SPKI: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEjlM7b6C/e0YluzBmfAH7YH75+LioD+9bMAYocDGHsqNz6x294DMYNm0Gn4Om9ZAAU8c2M8sEGyHFXhqGwfQAtA==";

const HELLO_BANG_HASH: &str = "LrvfEybaxmrV1QvEg2icO41ToJrlV+yrKc+uC//1LgI=";
const PADDED_HELLO_HASH: &str = "9lzD7ENwWAbD7o4KyO6+OTPGQobFTfKFAb/KwVp+OsA=";
const HELLO_HASH: &str = "rBN6dxxvojaWasSKaeba3KS/f7l3EHQ27ERQIqtl+7g=";

fn agent() -> Agent {
    let key = SecretKey::from_slice(&hex::decode(AGENT_SCALAR).unwrap()).unwrap();
    Agent::new(AGENT_ID, key)
}

fn setup() -> (
    Arc<InMemoryKeyLookup>,
    Arc<RecordingSubmitter>,
    VerificationOrchestrator,
) {
    let lookup = Arc::new(InMemoryKeyLookup::new());
    let submitter = Arc::new(RecordingSubmitter::new());
    let orchestrator = VerificationOrchestrator::new(lookup.clone(), submitter.clone());
    (lookup, submitter, orchestrator)
}

fn hashes(submitter: &RecordingSubmitter) -> Vec<String> {
    submitter
        .batches()
        .concat()
        .into_iter()
        .map(|s| s.hash)
        .collect()
}

/// Test: one key, message without surrounding whitespace
#[tokio::test]
async fn integration_single_key_single_variant() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);

    let verified = orchestrator
        .mark_as_verified(PHONE, &agent(), "hello!")
        .await
        .unwrap();
    assert!(verified);

    let batches = submitter.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].hash, HELLO_BANG_HASH);
    assert_eq!(batches[0][0].agent_id, AGENT_ID);
    assert_eq!(lookup.requests(), vec![vec![PHONE.to_string()]]);
}

/// Test: padded message yields the original and the trimmed variant
#[tokio::test]
async fn integration_padded_message_two_variants() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);

    let outcome = orchestrator.verify(PHONE, &agent(), "  hello  ").await;
    assert!(outcome.is_verified());
    assert_eq!(hashes(&submitter), vec![PADDED_HELLO_HASH, HELLO_HASH]);
}

/// Test: hashes are ordered keys outer, variants inner
#[tokio::test]
async fn integration_multiple_keys_ordering() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);
    lookup.register(PHONE, DEVICE2_SPKI);

    assert!(orchestrator
        .mark_as_verified(PHONE, &agent(), "  hello  ")
        .await
        .unwrap());

    let key = SecretKey::from_slice(&hex::decode(AGENT_SCALAR).unwrap()).unwrap();
    let device2_padded = message_hash(DEVICE2_SPKI, &key, b"  hello  ").unwrap();
    let device2_trimmed = message_hash(DEVICE2_SPKI, &key, b"hello").unwrap();

    assert_eq!(submitter.batches().len(), 1);
    assert_eq!(
        hashes(&submitter),
        vec![
            PADDED_HELLO_HASH.to_string(),
            HELLO_HASH.to_string(),
            device2_padded.to_base64(),
            device2_trimmed.to_base64(),
        ]
    );
}

/// Test: a second device's hash matches the published vector
#[tokio::test]
async fn integration_second_device_vector() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE2_SPKI);

    assert!(orchestrator
        .mark_as_verified(PHONE, &agent(), "hello!")
        .await
        .unwrap());

    let batches = submitter.batches();
    let raw = base64_decode(&batches[0][0].hash);
    assert_eq!(
        hex::encode(raw),
        "e9ba6e426c1079c0b0c21a85c08e92a08d7d6e1b3769e48758418a7146670a25"
    );
}

/// Test: keys registered to other numbers are ignored
#[tokio::test]
async fn integration_foreign_keys_filtered() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);
    lookup.register(OTHER_PHONE, DEVICE2_SPKI);
    lookup.return_all_numbers(true);

    assert!(orchestrator
        .mark_as_verified(PHONE, &agent(), "hello!")
        .await
        .unwrap());
    assert_eq!(hashes(&submitter), vec![HELLO_BANG_HASH]);
}

/// Test: unregistered number is a definitive "not supported"
#[tokio::test]
async fn integration_no_keys_not_supported() {
    let (_lookup, submitter, orchestrator) = setup();

    let verified = orchestrator
        .mark_as_verified(PHONE, &agent(), "hello!")
        .await
        .unwrap();
    assert!(!verified);
    assert!(submitter.batches().is_empty());
}

/// Test: a key on the wrong curve aborts the whole batch
#[tokio::test]
async fn integration_wrong_curve_submits_nothing() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);
    lookup.register(PHONE, P256_SPKI);

    let err = orchestrator
        .mark_as_verified(PHONE, &agent(), "hello!")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreconditionFailed);

    let meta = err.metadata();
    assert_eq!(meta.get("public_key.curve_name").map(String::as_str), Some("P-256"));
    assert_eq!(meta.get("expected_curve").map(String::as_str), Some("P-384"));
    assert!(meta.contains_key("public_key.x"));
    assert!(submitter.batches().is_empty());
}

/// Test: undecodable key is a decoding error, nothing submitted
#[tokio::test]
async fn integration_garbage_key_submits_nothing() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, "not base64 at all!");

    let outcome = orchestrator.verify(PHONE, &agent(), "hello!").await;
    match outcome {
        VerificationOutcome::Error(err) => assert_eq!(err.kind(), ErrorKind::Decoding),
        other => panic!("expected error, got {:?}", other),
    }
    assert!(submitter.batches().is_empty());
}

/// Test: non-2xx submission status is an error, not "not supported"
#[tokio::test]
async fn integration_rejected_submission() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);
    submitter.respond_with(SubmissionStatus::new(503, "Service Unavailable"));

    let err = orchestrator
        .mark_as_verified(PHONE, &agent(), "hello!")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("503 Service Unavailable"));
    assert_eq!(submitter.batches().len(), 1);
}

/// Test: submission transport failure surfaces as error
#[tokio::test]
async fn integration_submission_transport_failure() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);
    submitter.fail_with("connection refused");

    let outcome = orchestrator.verify(PHONE, &agent(), "hello!").await;
    assert!(matches!(
        outcome,
        VerificationOutcome::Error(VerifyError::Transport { .. })
    ));
}

/// Test: configured hash length flows through to submissions
#[tokio::test]
async fn integration_configured_hash_len() {
    let lookup = Arc::new(InMemoryKeyLookup::new());
    let submitter = Arc::new(RecordingSubmitter::new());
    lookup.register(PHONE, DEVICE_SPKI);

    let config = VerifiedSmsConfig {
        hash_len: 16,
        ..VerifiedSmsConfig::default()
    };
    let orchestrator =
        VerificationOrchestrator::from_config(&config, lookup, submitter.clone()).unwrap();

    assert!(orchestrator
        .mark_as_verified(PHONE, &agent(), "hello!")
        .await
        .unwrap());
    let raw = base64_decode(&hashes(&submitter)[0]);
    assert_eq!(raw.len(), 16);
}

/// Test: agent loaded from PEM produces the same hashes
#[tokio::test]
async fn integration_agent_from_pem() {
    let (lookup, submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);

    let pem = include_str!("fixtures/agent_pkcs8.pem");
    let agent = Agent::from_pem(AGENT_ID, pem).unwrap();

    assert!(orchestrator
        .mark_as_verified(PHONE, &agent, "hello!")
        .await
        .unwrap());
    assert_eq!(hashes(&submitter), vec![HELLO_BANG_HASH]);
}

/// Test: public keys are returned verbatim for the number
#[tokio::test]
async fn integration_get_public_keys() {
    let (lookup, _submitter, orchestrator) = setup();
    lookup.register(PHONE, DEVICE_SPKI);
    lookup.register(PHONE, DEVICE2_SPKI);

    let keys = orchestrator
        .get_public_keys_for_phone_number(PHONE)
        .await
        .unwrap();
    assert_eq!(keys, vec![DEVICE_SPKI, DEVICE2_SPKI]);
}

fn base64_decode(value: &str) -> Vec<u8> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .unwrap()
}
