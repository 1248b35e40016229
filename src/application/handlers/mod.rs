//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod alexa;
pub mod conversation;

pub use alexa::{
    ErrorTranslator, HandleAlexaRequestCommand, HandleAlexaRequestHandler, RequestOutcome,
};
pub use conversation::{ConversationManager, GreeterHandler, TURNS_HEARD_KEY};
