//! ConversationManager - routes a lifecycle signal to the handler operation.

use std::sync::Arc;

use tracing::debug;

use crate::domain::voice::{ConversationInput, MessageType, ReplyBuilder};
use crate::ports::{ConversationHandler, HandlerResult};

/// Dispatches neutral input to the business handler.
///
/// Stop and Cancel never reach business logic: they end the conversation
/// with no speech. Everything else maps one-to-one onto a handler operation.
#[derive(Clone)]
pub struct ConversationManager {
    handler: Arc<dyn ConversationHandler>,
}

impl ConversationManager {
    pub fn new(handler: Arc<dyn ConversationHandler>) -> Self {
        Self { handler }
    }

    /// Runs the operation matching `input.message_type()`.
    ///
    /// The returned output is not yet finalized.
    pub fn dispatch(&self, input: &ConversationInput, reply: ReplyBuilder) -> HandlerResult {
        let message_type = input.message_type();
        debug!(message_type = %message_type, "Dispatching conversation input");

        match message_type {
            MessageType::StartOfConversation => self.handler.on_conversation_start(input, reply),
            MessageType::Help => self.handler.on_help_request(input, reply),
            MessageType::EndOfConversation => self.handler.on_conversation_end(input, reply),
            MessageType::Stop | MessageType::Cancel => {
                let mut reply = reply;
                reply.end_conversation();
                Ok(reply.build())
            }
            MessageType::Default => self.handler.on_conversation_turn(input, reply),
        }
    }
}

impl std::fmt::Debug for ConversationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationManager").finish_non_exhaustive()
    }
}
