//! Alexa request handlers.
//!
//! The orchestrator for one inbound Alexa envelope and the translator that
//! renders pipeline errors as Alexa responses.

mod error_translator;
mod handle_request;

pub use error_translator::ErrorTranslator;
pub use handle_request::{HandleAlexaRequestCommand, HandleAlexaRequestHandler, RequestOutcome};
