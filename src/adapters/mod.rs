//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to external systems:
//! - `account_linking` - Linked-account stores
//! - `http` - Axum endpoints for platform webhooks
//! - `origin` - Request origin validators

pub mod account_linking;
pub mod http;
pub mod origin;

pub use account_linking::InMemoryAccountLinkingRepository;
pub use http::{app_router, AlexaAppState};
pub use origin::{AlexaOriginValidator, StaticOriginValidator};
