//! ErrorTranslator - turns any pipeline error into a speakable Alexa response.

use tracing::debug;

use crate::domain::foundation::{ErrorRecord, VoiceError};
use crate::domain::platform::alexa::AlexaResponseEnvelope;
use crate::domain::ssml::TagFilter;
use crate::domain::voice::Metadata;

/// Renders error responses for Alexa.
///
/// Translation is infallible: every error produces a well-formed envelope
/// with speech. Debug text is logged, never spoken.
#[derive(Debug, Clone, Default)]
pub struct ErrorTranslator {
    filter: TagFilter,
}

impl ErrorTranslator {
    pub fn new(filter: TagFilter) -> Self {
        Self { filter }
    }

    pub fn translate(
        &self,
        err: &VoiceError,
        version: &str,
        metadata_snapshot: Metadata,
    ) -> AlexaResponseEnvelope {
        let record = ErrorRecord::from_error(err, metadata_snapshot);
        debug!(
            reason = %record.reason,
            debug_message = %record.debug_message,
            "Translating error into platform response"
        );
        AlexaResponseEnvelope::from_error(record, version, &self.filter)
    }
}
