//! Alexa response envelope wire types and rendering.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::ErrorRecord;
use crate::domain::ssml::TagFilter;
use crate::domain::voice::ConversationOutput;

/// Protocol version written on every response.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Response envelope returned to Alexa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlexaResponseEnvelope {
    pub version: String,

    #[serde(default)]
    pub session_attributes: Map<String, Value>,

    pub response: SpeechletResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<SimpleCard>,

    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleCard {
    #[serde(rename = "type")]
    pub card_type: String,
    pub title: String,
    pub content: String,
}

impl SimpleCard {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            card_type: "Simple".to_string(),
            title: title.into(),
            content: content.into(),
        }
    }
}

impl AlexaResponseEnvelope {
    /// Renders a finalized conversation output.
    ///
    /// An ended conversation carries no speech and no card. An open
    /// conversation with empty markup also omits speech.
    pub fn from_output(output: ConversationOutput, version: &str) -> Self {
        let should_end_session = output.conversation_ended();
        let (output_speech, card) = if should_end_session {
            (None, None)
        } else {
            let speech = Some(output.speech_markup())
                .filter(|m| !m.trim().is_empty())
                .map(ssml_speech);
            let card = output.card().map(|c| SimpleCard::new(c.title, c.text));
            (speech, card)
        };

        Self {
            version: version.to_string(),
            session_attributes: output.into_metadata().into_session_attributes(),
            response: SpeechletResponse {
                output_speech,
                card,
                should_end_session,
            },
        }
    }

    /// Renders an error record.
    ///
    /// Error speech is always present, filtered like handler speech. Markup
    /// that filters down to nothing is replaced by the reason's own speech.
    pub fn from_error(record: ErrorRecord, version: &str, filter: &TagFilter) -> Self {
        let filtered = filter.strip(&record.user_facing_markup);
        let markup = if filtered.trim().is_empty() {
            record.reason.default_markup().to_string()
        } else {
            filtered.into_owned()
        };
        Self {
            version: version.to_string(),
            session_attributes: record.metadata_snapshot.into_session_attributes(),
            response: SpeechletResponse {
                output_speech: Some(ssml_speech(&markup)),
                card: None,
                should_end_session: record.reason.ends_session(),
            },
        }
    }

    /// The SSML document, if speech is present.
    pub fn ssml(&self) -> Option<&str> {
        match &self.response.output_speech {
            Some(OutputSpeech::Ssml { ssml }) => Some(ssml),
            None => None,
        }
    }
}

fn ssml_speech(markup: &str) -> OutputSpeech {
    OutputSpeech::Ssml {
        ssml: format!("<speak>{}</speak>", markup.trim()),
    }
}
