use super::error::ConfigError;
use super::provider::ProviderConfig;
use super::routing::RoutingConfig;
use std::path::Path;

/// Application configuration loaded from relay.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_provider: String,
    pub model: String,
    pub system_prompt: Option<String>,
    pub providers: Vec<ProviderConfig>,
    pub routing: Option<RoutingConfig>,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Look up a configured provider by id
    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|provider| provider.id == id)
    }
}
