//! GreeterHandler - sample skill wired into the binary.
//!
//! Greets, explains itself, and echoes back what it heard. The number of
//! turns it has acknowledged is kept in session metadata.

use std::time::Duration;

use crate::domain::ssml::EmphasisLevel;
use crate::domain::voice::{ConversationInput, ReplyBuilder};
use crate::ports::{ConversationHandler, HandlerResult};

/// Metadata key holding the number of acknowledged turns.
pub const TURNS_HEARD_KEY: &str = "turnsHeard";

const SKILL_NAME: &str = "Voice Adapter";

#[derive(Debug, Clone, Copy, Default)]
pub struct GreeterHandler;

impl GreeterHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ConversationHandler for GreeterHandler {
    fn on_conversation_start(&self, _input: &ConversationInput, mut reply: ReplyBuilder) -> HandlerResult {
        reply
            .emphasis("Welcome!", EmphasisLevel::Moderate)
            .pause(Duration::from_millis(300))
            .say("Say anything and I will tell you what I heard.")
            .card(SKILL_NAME, "Say anything and I will tell you what I heard.");
        Ok(reply.build())
    }

    fn on_help_request(&self, _input: &ConversationInput, mut reply: ReplyBuilder) -> HandlerResult {
        reply
            .say("I repeat the intent and slot values I receive.")
            .say("Say stop when you are done.");
        Ok(reply.build())
    }

    fn on_conversation_turn(&self, input: &ConversationInput, mut reply: ReplyBuilder) -> HandlerResult {
        let heard = reply
            .metadata()
            .get_as::<u64>(TURNS_HEARD_KEY)
            .unwrap_or(0)
            .saturating_add(1);
        reply.set_metadata(TURNS_HEARD_KEY, heard)?;

        match input.intent_name() {
            Some(intent) => {
                reply.say(&format!("I heard the {} intent.", intent));
            }
            None => {
                reply.say("I heard you.");
            }
        }

        let slots: Vec<String> = input
            .slots()
            .iter()
            .map(|(name, value)| format!("{} is {}", name, value))
            .collect();
        if !slots.is_empty() {
            reply.say(&format!("{}.", slots.join(", ")));
        }

        Ok(reply.build())
    }
}
