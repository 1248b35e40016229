//! Platform adapters and the registry that selects between them.

pub mod alexa;
mod registry;

pub use registry::{AdapterEntry, AdapterRegistry, InputConstructor};
