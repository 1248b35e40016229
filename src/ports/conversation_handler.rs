//! Conversation Handler Port - business logic invoked by the dispatcher.
//!
//! Implementations hold the actual skill behaviour. Each lifecycle operation
//! receives the read-only input and an owned [`ReplyBuilder`] already seeded
//! with the session metadata, and returns the finished output.
//!
//! # Contract
//!
//! Implementations must:
//! - Be shareable across request threads (`Send + Sync`)
//! - Keep any cross-request state in a concurrency-safe container
//! - Return `HandlerError::Business` with user-facing speech for expected
//!   failures; anything else is reported as a generic apology
//!
//! # Example Implementation
//!
//! ```ignore
//! struct WeatherHandler;
//!
//! impl ConversationHandler for WeatherHandler {
//!     fn on_conversation_turn(
//!         &self,
//!         input: &ConversationInput,
//!         mut reply: ReplyBuilder,
//!     ) -> Result<ConversationOutput, HandlerError> {
//!         let city = input.slot("City").ok_or_else(|| {
//!             HandlerError::business("Which city?", "City slot missing")
//!         })?;
//!         reply.say(&format!("It is sunny in {}.", city));
//!         Ok(reply.build())
//!     }
//!     // ...
//! }
//! ```

use crate::domain::foundation::HandlerError;
use crate::domain::voice::{ConversationInput, ConversationOutput, ReplyBuilder};

/// Result of a lifecycle operation.
pub type HandlerResult = Result<ConversationOutput, HandlerError>;

/// Business logic for each conversation lifecycle signal.
pub trait ConversationHandler: Send + Sync {
    /// First turn of a conversation.
    fn on_conversation_start(&self, input: &ConversationInput, reply: ReplyBuilder) -> HandlerResult;

    /// User asked for help. Does not end the session.
    fn on_help_request(&self, input: &ConversationInput, reply: ReplyBuilder) -> HandlerResult;

    /// Ordinary utterance.
    fn on_conversation_turn(&self, input: &ConversationInput, reply: ReplyBuilder) -> HandlerResult;

    /// Platform closed the session.
    ///
    /// Speech produced here is never rendered; override to update metadata
    /// or release resources.
    fn on_conversation_end(&self, _input: &ConversationInput, mut reply: ReplyBuilder) -> HandlerResult {
        reply.end_conversation();
        Ok(reply.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::platform::alexa::AlexaRequest;
    use crate::domain::ssml::TagFilter;
    use crate::domain::voice::{MessageType, Metadata, PlatformRequest};

    struct Silent;

    impl ConversationHandler for Silent {
        fn on_conversation_start(&self, _: &ConversationInput, reply: ReplyBuilder) -> HandlerResult {
            Ok(reply.build())
        }

        fn on_help_request(&self, _: &ConversationInput, reply: ReplyBuilder) -> HandlerResult {
            Ok(reply.build())
        }

        fn on_conversation_turn(&self, _: &ConversationInput, reply: ReplyBuilder) -> HandlerResult {
            Ok(reply.build())
        }
    }

    #[test]
    fn default_end_handler_ends_conversation() {
        let input = ConversationInput::new(
            MessageType::EndOfConversation,
            PlatformRequest::Alexa(AlexaRequest::of_type("SessionEndedRequest")),
            Metadata::new(),
        );
        let reply = ReplyBuilder::for_input(&input, TagFilter::none());

        let output = Silent.on_conversation_end(&input, reply).unwrap();

        assert!(output.conversation_ended());
    }

    #[test]
    fn conversation_handler_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ConversationHandler>();
    }
}
