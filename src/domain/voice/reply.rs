//! Output assembly for business handlers.
//!
//! A [`ReplyBuilder`] is handed to the handler by value, already seeded with
//! the request's metadata and the target platform's markup filter. The handler
//! appends speech, optionally sets a card, edits metadata, and returns the
//! result of [`ReplyBuilder::build`].
//!
//! ```
//! use voice_adapter::domain::ssml::TagFilter;
//! use voice_adapter::domain::voice::{Metadata, ReplyBuilder};
//!
//! let mut reply = ReplyBuilder::new(Metadata::new(), TagFilter::new(["emphasis"]).unwrap());
//! reply.speak("<emphasis>hi</emphasis> there").card("Greeting", "hi there");
//! let output = reply.build();
//!
//! assert_eq!(output.speech_markup(), "hi there");
//! assert!(!output.conversation_ended());
//! ```

use std::time::Duration;

use serde_json::Value;

use crate::domain::ssml::{EmphasisLevel, SsmlDocumentBuilder, TagFilter};

use super::{ConversationInput, ConversationOutput, Metadata, MetadataError};

/// Incrementally assembles a [`ConversationOutput`].
#[derive(Debug, Clone, Default)]
pub struct ReplyBuilder {
    document: SsmlDocumentBuilder,
    card_title: Option<String>,
    card_text: Option<String>,
    conversation_ended: bool,
    metadata: Metadata,
}

impl ReplyBuilder {
    /// Creates a builder carrying `metadata` forward.
    pub fn new(metadata: Metadata, filter: TagFilter) -> Self {
        Self {
            document: SsmlDocumentBuilder::new(filter),
            card_title: None,
            card_text: None,
            conversation_ended: false,
            metadata,
        }
    }

    /// Creates a builder seeded with a copy of the input's metadata.
    pub fn for_input(input: &ConversationInput, filter: TagFilter) -> Self {
        Self::new(input.metadata().clone(), filter)
    }

    /// Appends a markup fragment.
    pub fn speak(&mut self, markup: &str) -> &mut Self {
        self.document.markup(markup);
        self
    }

    /// Appends plain text (escaped).
    pub fn say(&mut self, text: &str) -> &mut Self {
        self.document.text(text);
        self
    }

    pub fn pause(&mut self, duration: Duration) -> &mut Self {
        self.document.pause(duration);
        self
    }

    pub fn emphasis(&mut self, text: &str, level: EmphasisLevel) -> &mut Self {
        self.document.emphasis(text, level);
        self
    }

    /// Sets both card fields.
    pub fn card(&mut self, title: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.card_title = Some(title.into());
        self.card_text = Some(text.into());
        self
    }

    pub fn card_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.card_title = Some(title.into());
        self
    }

    pub fn card_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.card_text = Some(text.into());
        self
    }

    /// Requests that the platform close the session after this response.
    pub fn end_conversation(&mut self) -> &mut Self {
        self.conversation_ended = true;
        self
    }

    pub fn is_conversation_end(&self) -> bool {
        self.conversation_ended
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Sets a handler-owned metadata key.
    pub fn set_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, MetadataError> {
        self.metadata.insert(key, value)?;
        Ok(self)
    }

    /// Removes a handler-owned metadata key.
    pub fn remove_metadata(&mut self, key: &str) -> Result<&mut Self, MetadataError> {
        self.metadata.remove(key)?;
        Ok(self)
    }

    /// Finalizes the speech markup and produces the output.
    pub fn build(self) -> ConversationOutput {
        ConversationOutput::new(
            self.document.build(),
            self.card_title,
            self.card_text,
            self.conversation_ended,
            self.metadata,
        )
    }
}
