//! Cross-turn session metadata.
//!
//! Platforms hand us an opaque attribute map with every request and store
//! whatever we send back. [`Metadata`] is the neutral view of that map. It is
//! converted from the platform attributes once on the way in and back once on
//! the way out; no key is dropped or renamed in between.
//!
//! Keys under [`RESERVED_PREFIX`] belong to the adaptation layer itself and
//! cannot be written by business handlers.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::MessageType;

/// Namespace for keys managed by the adaptation layer.
pub const RESERVED_PREFIX: &str = "_voice.";

/// Number of completed turns in the current session.
pub const TURN_KEY: &str = "_voice.turn";

/// Lifecycle signal of the most recent completed turn.
pub const LAST_MESSAGE_TYPE_KEY: &str = "_voice.lastMessageType";

/// Errors raised when a handler edits metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("Metadata key '{0}' is reserved for internal use")]
    ReservedKey(String),

    #[error("Metadata key cannot be empty")]
    EmptyKey,
}

/// Flat string-keyed bag of session state.
///
/// Keys removed through [`Metadata::remove`] are remembered for the rest of
/// the request so [`Metadata::carry_forward`] does not restore them. That
/// record is never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, Value>,

    #[serde(skip)]
    removed: BTreeSet<String>,
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Metadata {
    /// Creates an empty metadata bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a platform session-attribute map as-is, reserved keys included.
    pub fn from_session_attributes(attributes: Map<String, Value>) -> Self {
        Self::from_entries(attributes.into_iter().collect())
    }

    fn from_entries(entries: BTreeMap<String, Value>) -> Self {
        Self {
            entries,
            removed: BTreeSet::new(),
        }
    }

    /// Converts back into a platform session-attribute map.
    pub fn into_session_attributes(self) -> Map<String, Value> {
        self.entries.into_iter().collect()
    }

    /// Returns true if `key` is managed by the adaptation layer.
    pub fn is_reserved(key: &str) -> bool {
        key.starts_with(RESERVED_PREFIX)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Reads a value and deserializes it into `T`.
    ///
    /// Returns `None` when the key is absent or holds a different shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sets a handler-owned key, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, MetadataError> {
        let key = key.into();
        Self::check_writable(&key)?;
        self.removed.remove(&key);
        Ok(self.entries.insert(key, value.into()))
    }

    /// Removes a handler-owned key, returning its value.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, MetadataError> {
        Self::check_writable(key)?;
        self.removed.insert(key.to_string());
        Ok(self.entries.remove(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries a business handler owns (everything outside the reserved namespace).
    pub fn handler_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(k, _)| !Self::is_reserved(k))
    }

    /// Number of turns completed so far in this session.
    pub fn turn(&self) -> u64 {
        self.get_as(TURN_KEY).unwrap_or(0)
    }

    /// Lifecycle signal of the previous turn, if any.
    pub fn last_message_type(&self) -> Option<MessageType> {
        self.get_as(LAST_MESSAGE_TYPE_KEY)
    }

    /// Stamps core bookkeeping for a completed turn.
    pub(crate) fn record_turn(&mut self, message_type: MessageType) {
        let next = self.turn().saturating_add(1);
        self.entries.insert(TURN_KEY.to_string(), Value::from(next));
        self.entries.insert(
            LAST_MESSAGE_TYPE_KEY.to_string(),
            Value::from(message_type.as_str()),
        );
    }

    /// Reconciles a handler's metadata with the request it answered.
    ///
    /// Reserved keys are reset to their inbound values whatever the handler
    /// returned. Inbound handler-owned keys missing here are restored unless
    /// they were explicitly removed.
    pub(crate) fn carry_forward(&mut self, inbound: &Metadata) {
        self.entries.retain(|k, _| !Self::is_reserved(k));
        for (key, value) in &inbound.entries {
            let restore = Self::is_reserved(key) || !self.removed.contains(key);
            if restore && !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), value.clone());
            }
        }
    }

    fn check_writable(key: &str) -> Result<(), MetadataError> {
        if key.is_empty() {
            return Err(MetadataError::EmptyKey);
        }
        if Self::is_reserved(key) {
            return Err(MetadataError::ReservedKey(key.to_string()));
        }
        Ok(())
    }
}
