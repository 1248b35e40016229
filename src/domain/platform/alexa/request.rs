//! Alexa request envelope wire types.
//!
//! The outer envelope is parsed leniently: the `request` body stays raw JSON
//! until the adapter registry turns it into an [`AlexaRequest`], so a
//! malformed body surfaces as an adapter failure rather than a parse error
//! at the HTTP boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reads an explicit JSON `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request envelope posted by Alexa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlexaRequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub session: Option<AlexaSession>,

    /// Raw request body, turned into an [`AlexaRequest`] by the adapter.
    #[serde(default)]
    pub request: Option<Value>,
}

impl AlexaRequestEnvelope {
    /// Session attributes sent with the request, empty if there is no session.
    pub fn session_attributes(&self) -> Map<String, Value> {
        self.session
            .as_ref()
            .map(|s| s.attributes.clone())
            .unwrap_or_default()
    }

    /// Skill application id the request is addressed to.
    pub fn application_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.application.as_ref())
            .map(|a| a.application_id.as_str())
    }

    /// ISO-8601 timestamp of the request body, if present.
    pub fn request_timestamp(&self) -> Option<&str> {
        self.request
            .as_ref()
            .and_then(|r| r.get("timestamp"))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlexaSession {
    #[serde(default, deserialize_with = "null_as_default")]
    pub new: bool,

    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub application: Option<AlexaApplication>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,

    #[serde(default)]
    pub user: Option<AlexaUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlexaApplication {
    pub application_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlexaUser {
    pub user_id: String,

    #[serde(default)]
    pub access_token: Option<String>,
}

/// Request body of an Alexa envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlexaRequest {
    #[serde(rename = "type")]
    pub request_type: String,

    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub intent: Option<AlexaIntent>,

    /// Why the session ended (`SessionEndedRequest` only).
    #[serde(default)]
    pub reason: Option<String>,
}

impl AlexaRequest {
    /// Creates a bare request of the given type.
    pub fn of_type(request_type: impl Into<String>) -> Self {
        Self {
            request_type: request_type.into(),
            request_id: None,
            timestamp: None,
            locale: None,
            intent: None,
            reason: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlexaIntent {
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub slots: BTreeMap<String, AlexaSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlexaSlot {
    pub name: String,

    #[serde(default)]
    pub value: Option<String>,
}
