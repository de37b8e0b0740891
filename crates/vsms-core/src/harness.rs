//! In-memory collaborators for tests.
//!
//! Both fakes record every call so tests can assert on exactly what would
//! have gone over the wire.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::VerifyError;
use crate::services::{HashSubmissionService, KeyLookupService};
use crate::types::{MessageSubmission, SubmissionStatus, UserKey};

/// Key lookup backed by a list of registrations.
#[derive(Default)]
pub struct InMemoryKeyLookup {
    keys: Mutex<Vec<UserKey>>,
    requests: Mutex<Vec<Vec<String>>>,
    failure: Mutex<Option<String>>,
    return_all: Mutex<bool>,
}

impl InMemoryKeyLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, phone_number: &str, public_key: &str) {
        self.keys.lock().push(UserKey {
            phone_number: phone_number.to_string(),
            public_key: public_key.to_string(),
        });
    }

    /// Answer every request with every registration, like a misbehaving
    /// service would.
    pub fn return_all_numbers(&self, enabled: bool) {
        *self.return_all.lock() = enabled;
    }

    /// Fail every subsequent request with a transport error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl KeyLookupService for InMemoryKeyLookup {
    async fn batch_get_keys(&self, phone_numbers: &[String]) -> Result<Vec<UserKey>, VerifyError> {
        self.requests.lock().push(phone_numbers.to_vec());

        if let Some(message) = self.failure.lock().clone() {
            return Err(VerifyError::Transport {
                service: "key lookup",
                message,
            });
        }

        let return_all = *self.return_all.lock();
        Ok(self
            .keys
            .lock()
            .iter()
            .filter(|k| return_all || phone_numbers.contains(&k.phone_number))
            .cloned()
            .collect())
    }
}

/// Submission sink that records batches and answers with a fixed status.
pub struct RecordingSubmitter {
    batches: Mutex<Vec<Vec<MessageSubmission>>>,
    status: Mutex<SubmissionStatus>,
    failure: Mutex<Option<String>>,
}

impl Default for RecordingSubmitter {
    fn default() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            status: Mutex::new(SubmissionStatus::ok()),
            failure: Mutex::new(None),
        }
    }
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, status: SubmissionStatus) {
        *self.status.lock() = status;
    }

    /// Fail every subsequent submission with a transport error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    pub fn batches(&self) -> Vec<Vec<MessageSubmission>> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl HashSubmissionService for RecordingSubmitter {
    async fn batch_create(
        &self,
        messages: &[MessageSubmission],
    ) -> Result<SubmissionStatus, VerifyError> {
        if let Some(message) = self.failure.lock().clone() {
            return Err(VerifyError::Transport {
                service: "hash submission",
                message,
            });
        }

        self.batches.lock().push(messages.to_vec());
        Ok(self.status.lock().clone())
    }
}
