//! Builds neutral conversation input from an Alexa request body.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::foundation::AdapterError;
use crate::domain::voice::{ConversationInput, MessageType, Metadata, PlatformRequest};

use super::AlexaRequest;

pub const LAUNCH_REQUEST: &str = "LaunchRequest";
pub const INTENT_REQUEST: &str = "IntentRequest";
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";

pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";

/// Input constructor registered for Alexa.
///
/// # Errors
///
/// - `Malformed` - body is not a valid Alexa request object
/// - `UnknownRequestType` - request type this adapter does not handle
/// - `MissingField` - an `IntentRequest` without an intent
pub fn build_input(raw: Value, metadata: Metadata) -> Result<ConversationInput, AdapterError> {
    let request: AlexaRequest = serde_json::from_value(raw)?;
    let message_type = resolve_message_type(&request)?;

    let (intent_name, slots) = match &request.intent {
        Some(intent) => (Some(intent.name.clone()), filled_slots(&intent.slots)),
        None => (None, BTreeMap::new()),
    };
    let request_id = request.request_id.clone();
    let locale = request.locale.clone();

    let mut input = ConversationInput::new(message_type, PlatformRequest::Alexa(request), metadata)
        .with_request_id(request_id)
        .with_locale(locale);
    if let Some(name) = intent_name {
        input = input.with_intent(name, slots);
    }
    Ok(input)
}

/// Maps Alexa request types and built-in intents onto lifecycle signals.
fn resolve_message_type(request: &AlexaRequest) -> Result<MessageType, AdapterError> {
    match request.request_type.as_str() {
        LAUNCH_REQUEST => Ok(MessageType::StartOfConversation),
        SESSION_ENDED_REQUEST => Ok(MessageType::EndOfConversation),
        INTENT_REQUEST => {
            let intent = request
                .intent
                .as_ref()
                .ok_or(AdapterError::MissingField("intent"))?;
            Ok(match intent.name.as_str() {
                HELP_INTENT => MessageType::Help,
                STOP_INTENT => MessageType::Stop,
                CANCEL_INTENT => MessageType::Cancel,
                _ => MessageType::Default,
            })
        }
        other => Err(AdapterError::UnknownRequestType(other.to_string())),
    }
}

fn filled_slots(slots: &BTreeMap<String, super::AlexaSlot>) -> BTreeMap<String, String> {
    slots
        .iter()
        .filter_map(|(key, slot)| slot.value.as_ref().map(|v| (key.clone(), v.clone())))
        .collect()
}
