//! Phone number to public key resolution.

use std::sync::Arc;

use tracing::debug;

use crate::errors::VerifyError;
use crate::services::KeyLookupService;

/// Thin wrapper over a [`KeyLookupService`]: one number per request, and
/// only keys registered to exactly that number are kept.
#[derive(Clone)]
pub struct KeyResolver {
    lookup: Arc<dyn KeyLookupService>,
}

impl KeyResolver {
    pub fn new(lookup: Arc<dyn KeyLookupService>) -> Self {
        Self { lookup }
    }

    /// Public keys registered for `phone_number`, in the order returned.
    /// An empty list is a valid answer.
    pub async fn resolve(&self, phone_number: &str) -> Result<Vec<String>, VerifyError> {
        let user_keys = self
            .lookup
            .batch_get_keys(&[phone_number.to_string()])
            .await?;
        let returned = user_keys.len();

        let keys: Vec<String> = user_keys
            .into_iter()
            .filter(|k| k.phone_number == phone_number)
            .map(|k| k.public_key)
            .collect();

        if keys.len() != returned {
            debug!(
                "Dropped {} keys registered to other numbers",
                returned - keys.len()
            );
        }
        debug!("Resolved {} keys for {}", keys.len(), phone_number);
        Ok(keys)
    }
}
