//! Voice platform identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::VoiceError;

/// The voice interface a request arrived from.
///
/// Adding a platform means adding a variant here and an entry in the
/// adapter registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    /// Amazon Alexa (speechlet envelope, SSML speech).
    Alexa,
}

impl InterfaceType {
    /// All known interface types.
    pub const ALL: [InterfaceType; 1] = [InterfaceType::Alexa];

    /// Stable lowercase identifier used in routes, config and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceType::Alexa => "alexa",
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceType {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        InterfaceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| VoiceError::UnsupportedPlatform(wanted.to_string()))
    }
}
