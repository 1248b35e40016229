//! Domain layer containing the neutral conversation model and platform adapters.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, platform enum, error taxonomy)
//! - `voice` - Neutral conversation input/output, metadata, output assembly
//! - `ssml` - Speech markup building and capability filtering
//! - `platform` - Platform wire formats and the adapter registry

pub mod foundation;
pub mod platform;
pub mod ssml;
pub mod voice;
