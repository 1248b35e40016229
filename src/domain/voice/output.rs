//! Neutral response produced by a business handler.

use serde::Serialize;

use crate::domain::ssml::TagFilter;

use super::{Metadata, MessageType};

/// Visual summary shown alongside speech on devices with a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub text: String,
}

/// A conversational response, independent of platform wire format.
///
/// Usually produced by [`ReplyBuilder::build`](super::ReplyBuilder::build),
/// which filters speech as it is appended. The orchestrator filters again
/// with [`ConversationOutput::filtered`] before rendering, since a handler may
/// assemble its output with a different filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConversationOutput {
    speech_markup: String,
    card_title: Option<String>,
    card_text: Option<String>,
    conversation_ended: bool,
    metadata: Metadata,
}

impl ConversationOutput {
    pub(crate) fn new(
        speech_markup: String,
        card_title: Option<String>,
        card_text: Option<String>,
        conversation_ended: bool,
        metadata: Metadata,
    ) -> Self {
        Self {
            speech_markup,
            card_title,
            card_text,
            conversation_ended,
            metadata,
        }
    }

    /// Speech markup without the platform's document wrapper.
    pub fn speech_markup(&self) -> &str {
        &self.speech_markup
    }

    pub fn card_title(&self) -> Option<&str> {
        self.card_title.as_deref()
    }

    pub fn card_text(&self) -> Option<&str> {
        self.card_text.as_deref()
    }

    /// The card to render, present only when both title and text are non-empty.
    pub fn card(&self) -> Option<Card> {
        match (self.card_title(), self.card_text()) {
            (Some(title), Some(text)) if !title.trim().is_empty() && !text.trim().is_empty() => {
                Some(Card {
                    title: title.to_string(),
                    text: text.to_string(),
                })
            }
            _ => None,
        }
    }

    pub fn conversation_ended(&self) -> bool {
        self.conversation_ended
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Consumes the output, returning its metadata.
    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }

    /// Strips the platform's unsupported tags from the speech markup.
    pub fn filtered(mut self, filter: &TagFilter) -> Self {
        let stripped = filter.strip(&self.speech_markup).into_owned();
        self.speech_markup = stripped;
        self
    }

    /// Applies lifecycle rules before rendering.
    ///
    /// A terminal signal forces the conversation to end. Once ended, speech
    /// and card are cleared whatever the handler wrote. Metadata is kept.
    pub fn finalize(mut self, message_type: MessageType) -> Self {
        if message_type.is_terminal() {
            self.conversation_ended = true;
        }
        if self.conversation_ended {
            self.speech_markup.clear();
            self.card_title = None;
            self.card_text = None;
        }
        self
    }
}
