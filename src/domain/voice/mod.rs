//! Neutral conversation model.
//!
//! Everything a business handler sees is expressed in these types; platform
//! wire formats never leak past the adapters in `domain::platform`.
//!
//! - `message_type` - Lifecycle signals
//! - `metadata` - Cross-turn session state
//! - `input` - Inbound request view
//! - `output` - Handler response
//! - `reply` - Output assembly

mod input;
mod message_type;
mod metadata;
mod output;
mod reply;

pub use input::{ConversationInput, PlatformRequest};
pub use message_type::MessageType;
pub use metadata::{
    Metadata, MetadataError, LAST_MESSAGE_TYPE_KEY, RESERVED_PREFIX, TURN_KEY,
};
pub use output::{Card, ConversationOutput};
pub use reply::ReplyBuilder;
