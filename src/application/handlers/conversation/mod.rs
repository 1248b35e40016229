//! Conversation lifecycle handlers.
//!
//! The dispatcher that routes lifecycle signals and the sample business handler.

mod greeter;
mod manager;

pub use greeter::{GreeterHandler, TURNS_HEARD_KEY};
pub use manager::ConversationManager;
