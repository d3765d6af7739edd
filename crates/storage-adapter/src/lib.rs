//! Persistent storage of model artifacts
//!
//! This crate provides the artifact store used by the model manager: one
//! JSON document per model identifier, addressed by a location string.

pub mod filesystem;
pub mod memory;
pub mod store;

// Re-export commonly used types
pub use filesystem::FilesystemAdapter;
pub use memory::MemoryAdapter;
pub use store::ArtifactStore;
