//! Request origin validation port.
//!
//! Platforms sign their requests so a skill can reject traffic that did not
//! come from them. This port reports only the pass/fail outcome of that
//! check; the orchestrator must call it before the request reaches any
//! business logic.
//!
//! Implementations exist for Alexa's certificate-URL and timestamp checks and
//! for tests (`adapters::origin`).

use async_trait::async_trait;
use thiserror::Error;

/// Everything an origin check may look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginCheck {
    /// `SignatureCertChainUrl` header.
    pub signature_cert_chain_url: Option<String>,
    /// `Signature` header.
    pub signature: Option<String>,
    /// Skill id the envelope is addressed to.
    pub application_id: Option<String>,
    /// Request body timestamp (ISO-8601).
    pub request_timestamp: Option<String>,
}

/// Reasons a request failed origin validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OriginValidationError {
    #[error("Missing signature certificate chain URL")]
    MissingCertChainUrl,

    #[error("Invalid signature certificate chain URL: {0}")]
    InvalidCertChainUrl(String),

    #[error("Missing request signature")]
    MissingSignature,

    #[error("Missing request timestamp")]
    MissingTimestamp,

    #[error("Invalid request timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Request timestamp outside tolerance")]
    TimestampOutOfRange,

    #[error("Request addressed to a different application")]
    ApplicationIdMismatch,

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Verifies that a request really came from the platform.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(())` only for requests they positively verified
/// - Never panic on malformed header values
#[async_trait]
pub trait RequestOriginValidator: Send + Sync {
    async fn validate(&self, check: &OriginCheck) -> Result<(), OriginValidationError>;
}
