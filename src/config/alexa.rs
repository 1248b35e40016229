//! Alexa platform configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::domain::platform::alexa::UNSUPPORTED_SSML_TAGS;
use crate::domain::ssml::TagFilter;

/// Largest accepted clock skew between Alexa and this server.
pub const MAX_TIMESTAMP_TOLERANCE_SECS: u64 = 3600;

/// Alexa skill configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AlexaConfig {
    /// Skill id; requests addressed to other skills are rejected when set
    pub application_id: Option<String>,

    /// SSML tags stripped from speech (comma-separated)
    #[serde(default = "default_unsupported_ssml_tags")]
    pub unsupported_ssml_tags: String,

    /// Honour `testFlag` and skip origin validation
    #[serde(default)]
    pub allow_test_flag: bool,

    /// Accepted age of a request timestamp in seconds
    #[serde(default = "default_timestamp_tolerance")]
    pub timestamp_tolerance_secs: u64,
}

impl AlexaConfig {
    /// Configured unsupported tags as a vector
    pub fn unsupported_tags_list(&self) -> Vec<String> {
        self.unsupported_ssml_tags
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Markup filter for the configured tags
    pub fn tag_filter(&self) -> Result<TagFilter, ValidationError> {
        TagFilter::new(self.unsupported_tags_list())
            .map_err(|e| ValidationError::InvalidSsmlTag(e.to_string()))
    }

    /// Configured application id, ignoring blank values
    pub fn application_id(&self) -> Option<&str> {
        self.application_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Validate Alexa configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.allow_test_flag && *environment == Environment::Production {
            return Err(ValidationError::TestFlagInProduction);
        }
        if self.timestamp_tolerance_secs == 0
            || self.timestamp_tolerance_secs > MAX_TIMESTAMP_TOLERANCE_SECS
        {
            return Err(ValidationError::InvalidTimestampTolerance {
                max: MAX_TIMESTAMP_TOLERANCE_SECS,
            });
        }
        self.tag_filter()?;
        Ok(())
    }
}

impl Default for AlexaConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            unsupported_ssml_tags: default_unsupported_ssml_tags(),
            allow_test_flag: false,
            timestamp_tolerance_secs: default_timestamp_tolerance(),
        }
    }
}

fn default_unsupported_ssml_tags() -> String {
    UNSUPPORTED_SSML_TAGS.join(",")
}

fn default_timestamp_tolerance() -> u64 {
    150
}
