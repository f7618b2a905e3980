//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use async_trait::async_trait;

/// Trait for a routed collection of backends; `request.provider` selects
/// which client handles the call
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Send a chat request to the backend named by the request
    async fn send(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}

/// Trait for individual model clients
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Get the client ID
    fn id(&self) -> &str;

    /// Send a chat request
    async fn send(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}
