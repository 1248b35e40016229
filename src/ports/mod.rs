//! Ports - Interfaces for collaborators outside the adaptation core.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! - `AccountLinkingRepository` - Linked-account and token storage
//! - `ConversationHandler` - Business logic invoked per lifecycle signal
//! - `RequestOriginValidator` - Platform signature/origin check

mod account_linking_repository;
mod conversation_handler;
mod origin_validator;

pub use account_linking_repository::{AccountLinkingError, AccountLinkingRepository, UserAccount};
pub use conversation_handler::{ConversationHandler, HandlerResult};
pub use origin_validator::{OriginCheck, OriginValidationError, RequestOriginValidator};
