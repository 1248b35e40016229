//! HTTP DTOs for the Alexa endpoint.
//!
//! The request and response bodies are the Alexa envelopes themselves; only
//! the query string and the health probe need their own types.

use serde::{Deserialize, Serialize};

/// Query parameters accepted by `POST /alexa`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlexaQuery {
    /// Request to skip origin validation; honoured only when enabled.
    #[serde(rename = "testFlag", default)]
    pub test_flag: Option<String>,
}

impl AlexaQuery {
    /// Whether `testFlag` was set to a truthy value.
    pub fn test_flag(&self) -> bool {
        self.test_flag
            .as_deref()
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false)
    }
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub platforms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_accepts_truthy_values() {
        for value in ["true", "TRUE", "1", "yes"] {
            let query = AlexaQuery {
                test_flag: Some(value.to_string()),
            };
            assert!(query.test_flag(), "{}", value);
        }
    }

    #[test]
    fn test_flag_defaults_to_false() {
        assert!(!AlexaQuery::default().test_flag());
        let query = AlexaQuery {
            test_flag: Some("false".to_string()),
        };
        assert!(!query.test_flag());
    }

    #[test]
    fn query_deserializes_from_camel_case_name() {
        let query: AlexaQuery = serde_json::from_str(r#"{"testFlag":"true"}"#).unwrap();
        assert!(query.test_flag());
    }
}
