//! Neutral view of an inbound platform request.

use std::collections::BTreeMap;

use crate::domain::foundation::InterfaceType;
use crate::domain::platform::alexa::AlexaRequest;

use super::{Metadata, MessageType};

/// The platform payload an input was built from.
///
/// One variant per supported platform. Handlers that need platform details
/// beyond the neutral fields can match on it.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformRequest {
    Alexa(AlexaRequest),
}

impl PlatformRequest {
    /// The interface this payload came from.
    pub fn interface(&self) -> InterfaceType {
        match self {
            PlatformRequest::Alexa(_) => InterfaceType::Alexa,
        }
    }
}

/// A single conversational request, independent of platform wire format.
///
/// Built once per request by a platform adapter and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationInput {
    message_type: MessageType,
    raw_request: PlatformRequest,
    metadata: Metadata,
    intent_name: Option<String>,
    slots: BTreeMap<String, String>,
    request_id: Option<String>,
    locale: Option<String>,
    user_id: Option<String>,
    access_token: Option<String>,
    new_session: bool,
}

impl ConversationInput {
    /// Creates an input with no intent details.
    pub fn new(message_type: MessageType, raw_request: PlatformRequest, metadata: Metadata) -> Self {
        Self {
            message_type,
            raw_request,
            metadata,
            intent_name: None,
            slots: BTreeMap::new(),
            request_id: None,
            locale: None,
            user_id: None,
            access_token: None,
            new_session: false,
        }
    }

    /// Attaches the resolved intent and its filled slots.
    pub fn with_intent(mut self, name: impl Into<String>, slots: BTreeMap<String, String>) -> Self {
        self.intent_name = Some(name.into());
        self.slots = slots;
        self
    }

    /// Attaches the platform's own request identifier.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Attaches the token of a linked third-party account.
    pub fn with_access_token(mut self, access_token: Option<String>) -> Self {
        self.access_token = access_token;
        self
    }

    /// Marks whether the platform opened a new session for this request.
    pub fn with_new_session(mut self, new_session: bool) -> Self {
        self.new_session = new_session;
        self
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn raw_request(&self) -> &PlatformRequest {
        &self.raw_request
    }

    pub fn interface(&self) -> InterfaceType {
        self.raw_request.interface()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.intent_name.as_deref()
    }

    pub fn slots(&self) -> &BTreeMap<String, String> {
        &self.slots
    }

    /// Value of a filled slot.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Token issued when the user linked an external account, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_new_session(&self) -> bool {
        self.new_session
    }
}
