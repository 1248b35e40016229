//! Conversation lifecycle signals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle signal carried by an inbound request.
///
/// Platforms express these differently (launch requests, built-in intents,
/// session-ended callbacks); adapters resolve them into this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    /// First turn of a new conversation.
    StartOfConversation,

    /// User asked for help.
    Help,

    /// Platform reports the conversation is over.
    EndOfConversation,

    /// User asked to stop.
    Stop,

    /// User cancelled.
    Cancel,

    /// Ordinary utterance continuing the conversation.
    #[default]
    Default,
}

impl MessageType {
    /// Returns true if this signal ends the conversation.
    ///
    /// Terminal signals suppress speech and card output and close the
    /// platform session regardless of what a handler produced.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::EndOfConversation | Self::Stop | Self::Cancel)
    }

    /// Stable name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartOfConversation => "START_OF_CONVERSATION",
            Self::Help => "HELP",
            Self::EndOfConversation => "END_OF_CONVERSATION",
            Self::Stop => "STOP",
            Self::Cancel => "CANCEL",
            Self::Default => "DEFAULT",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
