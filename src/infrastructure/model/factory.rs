//! Client factory - creates clients from config

use super::clients::{DirectClient, GatewayClient};
use super::traits::ModelClient;
use crate::config::ProviderConfig;
use std::env;
use tracing::warn;

/// Resolve API key from environment variable
pub fn resolve_api_key(provider: &str, spec: Option<&str>) -> Option<String> {
    let Some(raw) = spec.map(str::trim) else {
        return None;
    };
    if raw.is_empty() {
        return None;
    }
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating model clients from provider config.
pub struct ClientFactory;

impl ClientFactory {
    /// Creates a model client based on provider type.
    ///
    /// Supported types:
    /// - `gateway` → routing gateway with upstream handle headers
    /// - Others → direct OpenAI-compatible format (default)
    pub fn create(config: &ProviderConfig) -> Box<dyn ModelClient> {
        if config.is_gateway() {
            Box::new(GatewayClient::from_config(config))
        } else {
            Box::new(DirectClient::from_config(config))
        }
    }
}
