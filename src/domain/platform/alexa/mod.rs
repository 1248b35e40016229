//! Amazon Alexa adapter.
//!
//! - `request` - Inbound envelope and request body types
//! - `input` - Request body to neutral input
//! - `response` - Neutral output / error record to response envelope

mod input;
mod request;
mod response;

pub use input::{
    build_input, CANCEL_INTENT, HELP_INTENT, INTENT_REQUEST, LAUNCH_REQUEST,
    SESSION_ENDED_REQUEST, STOP_INTENT,
};
pub use request::{
    AlexaApplication, AlexaIntent, AlexaRequest, AlexaRequestEnvelope, AlexaSession, AlexaSlot,
    AlexaUser,
};
pub use response::{
    AlexaResponseEnvelope, OutputSpeech, SimpleCard, SpeechletResponse, PROTOCOL_VERSION,
};

/// SSML tags Alexa does not render.
pub const UNSUPPORTED_SSML_TAGS: &[&str] = &["emphasis"];
