//! Provider registry with multiple backends

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use super::factory::ClientFactory;
use super::traits::{ModelBackend, ModelClient};
use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::config::ProviderConfig;

/// Runtime container for a provider backend
struct ProviderRuntime {
    models: HashSet<String>,
    client: Box<dyn ModelClient>,
}

impl ProviderRuntime {
    fn supports(&self, model: &str) -> bool {
        self.models.is_empty() || self.models.contains(model)
    }
}

/// Registry that routes requests to the backend named by the request
#[derive(Default)]
pub struct ProviderRegistry {
    backends: HashMap<String, ProviderRuntime>,
}

impl ProviderRegistry {
    /// Create registry from config list using the factory
    pub fn from_configs(configs: &[ProviderConfig]) -> Self {
        let mut backends = HashMap::new();

        for config in configs {
            let models: HashSet<String> = config.models.iter().map(|m| m.name.clone()).collect();

            let client = ClientFactory::create(config);

            backends.insert(config.id.clone(), ProviderRuntime { models, client });
        }

        Self { backends }
    }

    /// Check if provider exists
    pub fn contains(&self, provider: &str) -> bool {
        self.backends.contains_key(provider)
    }
}

#[async_trait]
impl ModelBackend for ProviderRegistry {
    async fn send(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let provider_id = &request.provider;

        let runtime = self
            .backends
            .get(provider_id)
            .ok_or_else(|| ModelError::provider_not_found(provider_id))?;

        if !runtime.supports(&request.model) {
            return Err(ModelError::model_not_found(provider_id, &request.model));
        }

        runtime.client.send(request).await
    }
}
