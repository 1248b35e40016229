//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Test flag bypass cannot be enabled in production")]
    TestFlagInProduction,

    #[error("Timestamp tolerance must be between 1 and {max} seconds")]
    InvalidTimestampTolerance { max: u64 },

    #[error("Invalid SSML tag name: {0}")]
    InvalidSsmlTag(String),
}
