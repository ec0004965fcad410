//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core services expect from
//! infrastructure. They use only domain types.

pub mod completion;

pub use completion::ChatCompletionPort;
