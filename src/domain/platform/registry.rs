//! Adapter Registry - maps platform identifiers to input constructors.
//!
//! The registry is built once at first use and never modified afterwards, so
//! it can be shared by every request thread without locking.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use voice_adapter::domain::platform::AdapterRegistry;
//! use voice_adapter::domain::voice::MessageType;
//!
//! let input = AdapterRegistry::global()
//!     .build("alexa", json!({ "type": "LaunchRequest" }))
//!     .unwrap();
//! assert_eq!(input.message_type(), MessageType::StartOfConversation);
//!
//! assert!(AdapterRegistry::global().build("unknown", json!({})).is_err());
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::domain::foundation::{AdapterError, InterfaceType, VoiceError};
use crate::domain::ssml::{TagFilter, TagFilterError};
use crate::domain::voice::{ConversationInput, Metadata};

use super::alexa;

/// Builds neutral input from a platform's raw request body.
pub type InputConstructor = fn(Value, Metadata) -> Result<ConversationInput, AdapterError>;

/// What the registry knows about one platform.
#[derive(Debug, Clone, Copy)]
pub struct AdapterEntry {
    pub interface: InterfaceType,
    pub build_input: InputConstructor,
    /// Markup tags the platform cannot render.
    pub unsupported_tags: &'static [&'static str],
}

impl AdapterEntry {
    /// Tag filter for the platform's default capabilities.
    pub fn default_filter(&self) -> Result<TagFilter, TagFilterError> {
        TagFilter::new(self.unsupported_tags.iter().copied())
    }
}

static REGISTRY: Lazy<AdapterRegistry> = Lazy::new(AdapterRegistry::with_builtin_adapters);

/// Table of platform adapters.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    entries: HashMap<InterfaceType, AdapterEntry>,
}

impl AdapterRegistry {
    /// The process-wide registry with every built-in platform.
    pub fn global() -> &'static AdapterRegistry {
        &REGISTRY
    }

    /// Creates a registry holding every built-in platform adapter.
    pub fn with_builtin_adapters() -> Self {
        Self::default().with_adapter(AdapterEntry {
            interface: InterfaceType::Alexa,
            build_input: alexa::build_input,
            unsupported_tags: alexa::UNSUPPORTED_SSML_TAGS,
        })
    }

    /// Adds an adapter while the registry is being assembled.
    pub fn with_adapter(mut self, entry: AdapterEntry) -> Self {
        self.entries.insert(entry.interface, entry);
        self
    }

    pub fn entry(&self, interface: InterfaceType) -> Option<&AdapterEntry> {
        self.entries.get(&interface)
    }

    /// Registered platforms.
    pub fn platforms(&self) -> impl Iterator<Item = InterfaceType> + '_ {
        self.entries.keys().copied()
    }

    /// Looks up the entry for a platform identifier.
    ///
    /// # Errors
    ///
    /// `UnsupportedPlatform` for unknown identifiers and for known platforms
    /// without a registered adapter.
    pub fn resolve(&self, platform_id: &str) -> Result<&AdapterEntry, VoiceError> {
        let interface: InterfaceType = platform_id.parse()?;
        self.entry(interface)
            .ok_or_else(|| VoiceError::UnsupportedPlatform(interface.to_string()))
    }

    /// Builds input for a platform with empty metadata.
    pub fn build(&self, platform_id: &str, raw: Value) -> Result<ConversationInput, VoiceError> {
        self.build_with_metadata(platform_id, raw, Metadata::new())
    }

    /// Builds input for a platform, carrying prior session metadata.
    ///
    /// # Errors
    ///
    /// - `UnsupportedPlatform` - no adapter for `platform_id`
    /// - `AdapterConstructionFailed` - the adapter rejected `raw`
    pub fn build_with_metadata(
        &self,
        platform_id: &str,
        raw: Value,
        metadata: Metadata,
    ) -> Result<ConversationInput, VoiceError> {
        let entry = self.resolve(platform_id)?;
        Self::construct(entry, raw, metadata)
    }

    /// Builds input for an already-identified platform.
    pub fn build_for(
        &self,
        interface: InterfaceType,
        raw: Value,
        metadata: Metadata,
    ) -> Result<ConversationInput, VoiceError> {
        let entry = self
            .entry(interface)
            .ok_or_else(|| VoiceError::UnsupportedPlatform(interface.to_string()))?;
        Self::construct(entry, raw, metadata)
    }

    fn construct(
        entry: &AdapterEntry,
        raw: Value,
        metadata: Metadata,
    ) -> Result<ConversationInput, VoiceError> {
        (entry.build_input)(raw, metadata).map_err(|e| VoiceError::adapter(entry.interface, e))
    }
}
