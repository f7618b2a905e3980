//! Model infrastructure module
//!
//! Provides LLM backend clients with a factory pattern for easy extensibility.
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - ModelBackend, ModelClient traits
//! - `wire` - Wire-format conversion and param merging
//! - `factory` - Client factory for creating clients
//! - `clients` - Individual client implementations
//! - `registry` - ProviderRegistry for routing

pub mod clients;
pub mod factory;
pub mod registry;
pub mod traits;
pub mod types;
pub mod wire;

// Re-exports for convenience
pub use registry::ProviderRegistry;
pub use traits::{ModelBackend, ModelClient};
pub use types::{ModelError, ModelRequest, ModelResponse};
