//! Account-linking stores.
//!
//! - `InMemoryAccountLinkingRepository` - process-local store for development
//!   and tests

mod in_memory;

pub use in_memory::InMemoryAccountLinkingRepository;
