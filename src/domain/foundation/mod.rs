//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the platform enumeration and the error taxonomy
//! used by every stage of the adaptation pipeline.

mod errors;
mod ids;
mod interface_type;

pub use errors::{
    AdapterError, ErrorReason, ErrorRecord, HandlerError, VoiceError, FALLBACK_MARKUP,
};
pub use ids::RequestId;
pub use interface_type::InterfaceType;
