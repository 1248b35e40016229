//! Alexa request origin checks.
//!
//! Implements the structural part of Alexa's request verification:
//!
//! - `SignatureCertChainUrl` must point into Amazon's certificate bucket
//!   (`https://s3.amazonaws.com[:443]/echo.api/...`, after path normalization)
//! - a `Signature` header must be present
//! - the request timestamp must be within the configured tolerance
//! - when an application id is configured, the request must be addressed to it
//!
//! Downloading the certificate chain and verifying the signature bytes is not
//! performed here.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use url::Url;

use crate::config::{AlexaConfig, MAX_TIMESTAMP_TOLERANCE_SECS};
use crate::ports::{OriginCheck, OriginValidationError, RequestOriginValidator};

const CERT_HOST: &str = "s3.amazonaws.com";
const CERT_PATH_PREFIX: &str = "/echo.api/";
const CERT_PORT: u16 = 443;

/// Origin validator for Alexa-hosted skills.
#[derive(Debug, Clone)]
pub struct AlexaOriginValidator {
    application_id: Option<String>,
    tolerance: Duration,
}

impl AlexaOriginValidator {
    /// Tolerances above `MAX_TIMESTAMP_TOLERANCE_SECS` are clamped.
    pub fn new(application_id: Option<String>, tolerance_secs: u64) -> Self {
        Self {
            application_id,
            tolerance: Duration::seconds(tolerance_secs.min(MAX_TIMESTAMP_TOLERANCE_SECS) as i64),
        }
    }

    pub fn from_config(config: &AlexaConfig) -> Self {
        Self::new(
            config.application_id().map(str::to_string),
            config.timestamp_tolerance_secs,
        )
    }

    /// Runs every check against the given clock.
    pub fn check_at(&self, check: &OriginCheck, now: DateTime<Utc>) -> Result<(), OriginValidationError> {
        let cert_url = check
            .signature_cert_chain_url
            .as_deref()
            .ok_or(OriginValidationError::MissingCertChainUrl)?;
        validate_cert_chain_url(cert_url)?;

        if check.signature.as_deref().map_or(true, |s| s.trim().is_empty()) {
            return Err(OriginValidationError::MissingSignature);
        }

        let timestamp = check
            .request_timestamp
            .as_deref()
            .ok_or(OriginValidationError::MissingTimestamp)?;
        self.validate_timestamp(timestamp, now)?;

        if let Some(expected) = &self.application_id {
            if check.application_id.as_deref() != Some(expected.as_str()) {
                return Err(OriginValidationError::ApplicationIdMismatch);
            }
        }

        Ok(())
    }

    fn validate_timestamp(&self, timestamp: &str, now: DateTime<Utc>) -> Result<(), OriginValidationError> {
        let sent = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|e| OriginValidationError::InvalidTimestamp(e.to_string()))?
            .with_timezone(&Utc);

        let skew = now.signed_duration_since(sent);
        if skew > self.tolerance || skew < -self.tolerance {
            return Err(OriginValidationError::TimestampOutOfRange);
        }
        Ok(())
    }
}

fn validate_cert_chain_url(raw: &str) -> Result<(), OriginValidationError> {
    let invalid = |reason: &str| OriginValidationError::InvalidCertChainUrl(reason.to_string());

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

    if url.scheme() != "https" {
        return Err(invalid("scheme must be https"));
    }
    if !url
        .host_str()
        .map_or(false, |h| h.eq_ignore_ascii_case(CERT_HOST))
    {
        return Err(invalid("unexpected host"));
    }
    // `port()` is None when the scheme default (443) is used.
    if url.port().map_or(false, |p| p != CERT_PORT) {
        return Err(invalid("unexpected port"));
    }
    if !url.path().starts_with(CERT_PATH_PREFIX) {
        return Err(invalid("unexpected path"));
    }
    Ok(())
}

#[async_trait]
impl RequestOriginValidator for AlexaOriginValidator {
    async fn validate(&self, check: &OriginCheck) -> Result<(), OriginValidationError> {
        self.check_at(check, Utc::now())
    }
}
