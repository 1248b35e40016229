//! Request origin validators.
//!
//! - `AlexaOriginValidator` - certificate URL, signature presence, timestamp
//!   and application id checks for Alexa requests
//! - `StaticOriginValidator` - fixed accept/reject outcome for tests

mod alexa_validator;
mod static_validator;

pub use alexa_validator::AlexaOriginValidator;
pub use static_validator::StaticOriginValidator;
