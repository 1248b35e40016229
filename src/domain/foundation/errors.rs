//! Error types shared across the adaptation pipeline.

use std::fmt;
use thiserror::Error;

use super::InterfaceType;
use crate::domain::voice::{Metadata, MetadataError};

/// Generic apology used whenever nothing more specific can be said.
pub const FALLBACK_MARKUP: &str =
    "I'm sorry, something went wrong on my end. Please try again in a little while.";

/// Error reasons organized by where in the pipeline they arise.
///
/// Every reason maps to a stable code and to precomposed speech the end user
/// hears in place of the normal response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    // Pre-dispatch
    MissingRequestBody,
    OriginValidationFailed,
    UnsupportedPlatform,
    AdapterConstructionFailed,

    // Dispatch
    BusinessLogicError,

    // Catch-all
    UnclassifiedFailure,
}

impl ErrorReason {
    /// Precomposed speech for this reason.
    pub fn default_markup(&self) -> &'static str {
        match self {
            ErrorReason::MissingRequestBody => {
                "I'm sorry, I didn't receive enough information to answer that."
            }
            ErrorReason::OriginValidationFailed => {
                "I'm sorry, I couldn't verify where that request came from."
            }
            ErrorReason::UnsupportedPlatform => {
                "I'm sorry, I don't know how to talk to this device yet."
            }
            ErrorReason::AdapterConstructionFailed => {
                "I'm sorry, I didn't understand that request."
            }
            ErrorReason::BusinessLogicError | ErrorReason::UnclassifiedFailure => FALLBACK_MARKUP,
        }
    }

    /// Whether the platform session should close after reporting this error.
    ///
    /// Business errors keep the session open so the user can rephrase.
    pub fn ends_session(&self) -> bool {
        !matches!(self, ErrorReason::BusinessLogicError)
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorReason::MissingRequestBody => "MISSING_REQUEST_BODY",
            ErrorReason::OriginValidationFailed => "ORIGIN_VALIDATION_FAILED",
            ErrorReason::UnsupportedPlatform => "UNSUPPORTED_PLATFORM",
            ErrorReason::AdapterConstructionFailed => "ADAPTER_CONSTRUCTION_FAILED",
            ErrorReason::BusinessLogicError => "BUSINESS_LOGIC_ERROR",
            ErrorReason::UnclassifiedFailure => "UNCLASSIFIED_FAILURE",
        };
        write!(f, "{}", s)
    }
}

/// Errors raised by a platform input constructor.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Malformed request payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unrecognized request type: {0}")]
    UnknownRequestType(String),
}

/// Errors a business-logic handler may return from a lifecycle operation.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// Expected failure with speech prepared by the handler.
    #[error("Business logic error: {debug_message}")]
    Business {
        user_facing_markup: String,
        debug_message: String,
    },

    /// Anything the handler did not anticipate.
    #[error("Handler failed: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Creates a business error carrying its own user-facing speech.
    pub fn business(user_facing_markup: impl Into<String>, debug_message: impl Into<String>) -> Self {
        HandlerError::Business {
            user_facing_markup: user_facing_markup.into(),
            debug_message: debug_message.into(),
        }
    }

    /// Creates an unanticipated handler failure.
    pub fn internal(message: impl Into<String>) -> Self {
        HandlerError::Internal(message.into())
    }
}

impl From<MetadataError> for HandlerError {
    fn from(err: MetadataError) -> Self {
        HandlerError::Internal(err.to_string())
    }
}

/// Top-level error of the adaptation pipeline.
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Missing request body")]
    MissingRequestBody,

    #[error("Origin validation failed: {0}")]
    OriginValidationFailed(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Failed to build {platform} input: {source}")]
    AdapterConstructionFailed {
        platform: InterfaceType,
        #[source]
        source: AdapterError,
    },

    #[error("Business logic error: {debug_message}")]
    BusinessLogic {
        user_facing_markup: String,
        debug_message: String,
    },

    #[error("Unclassified failure: {0}")]
    Unclassified(String),
}

impl VoiceError {
    /// Creates an adapter construction failure for a platform.
    pub fn adapter(platform: InterfaceType, source: AdapterError) -> Self {
        VoiceError::AdapterConstructionFailed { platform, source }
    }

    /// Creates an unclassified failure.
    pub fn unclassified(message: impl Into<String>) -> Self {
        VoiceError::Unclassified(message.into())
    }

    /// The taxonomy entry for this error.
    pub fn reason(&self) -> ErrorReason {
        match self {
            VoiceError::MissingRequestBody => ErrorReason::MissingRequestBody,
            VoiceError::OriginValidationFailed(_) => ErrorReason::OriginValidationFailed,
            VoiceError::UnsupportedPlatform(_) => ErrorReason::UnsupportedPlatform,
            VoiceError::AdapterConstructionFailed { .. } => ErrorReason::AdapterConstructionFailed,
            VoiceError::BusinessLogic { .. } => ErrorReason::BusinessLogicError,
            VoiceError::Unclassified(_) => ErrorReason::UnclassifiedFailure,
        }
    }

    /// Speech the end user should hear for this error.
    ///
    /// Business errors use the handler's own speech unless it is blank.
    pub fn user_facing_markup(&self) -> &str {
        match self {
            VoiceError::BusinessLogic {
                user_facing_markup, ..
            } if !user_facing_markup.trim().is_empty() => user_facing_markup,
            other => other.reason().default_markup(),
        }
    }

    /// Free-text diagnostic, never spoken.
    pub fn debug_message(&self) -> String {
        match self {
            VoiceError::BusinessLogic { debug_message, .. } => debug_message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<HandlerError> for VoiceError {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Business {
                user_facing_markup,
                debug_message,
            } => VoiceError::BusinessLogic {
                user_facing_markup,
                debug_message,
            },
            HandlerError::Internal(message) => VoiceError::Unclassified(message),
        }
    }
}

/// Everything needed to render an error response.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub reason: ErrorReason,
    pub user_facing_markup: String,
    pub debug_message: String,
    pub metadata_snapshot: Metadata,
}

impl ErrorRecord {
    /// Builds a record from an error and whatever metadata was known.
    pub fn from_error(err: &VoiceError, metadata_snapshot: Metadata) -> Self {
        Self {
            reason: err.reason(),
            user_facing_markup: err.user_facing_markup().to_string(),
            debug_message: err.debug_message(),
            metadata_snapshot,
        }
    }
}
