//! Fixed-outcome origin validator for tests and local tooling.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::ports::{OriginCheck, OriginValidationError, RequestOriginValidator};

/// Origin validator that always returns the same outcome.
///
/// Counts how often it was consulted so tests can assert that validation
/// did (or did not) happen.
#[derive(Debug)]
pub struct StaticOriginValidator {
    outcome: Result<(), OriginValidationError>,
    calls: AtomicUsize,
}

impl StaticOriginValidator {
    /// Accepts every request.
    pub fn accepting() -> Self {
        Self {
            outcome: Ok(()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Rejects every request with `error`.
    pub fn rejecting(error: OriginValidationError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of validations performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestOriginValidator for StaticOriginValidator {
    async fn validate(&self, _check: &OriginCheck) -> Result<(), OriginValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
