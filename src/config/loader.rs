use super::error::ConfigError;
use super::provider::{ProviderConfig, RawProviderConfig};
use super::routing::{RawRoutingConfig, RoutingConfig, TargetConfig};
use crate::constants::{CONFIG_PATH, ENV_PATH};
use crate::domain::routing::RoutingStrategy;
use dotenvy::from_filename;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub model: Option<String>,
    pub default_provider: Option<String>,
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub providers: Vec<RawProviderConfig>,
    pub routing: Option<RawRoutingConfig>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration from a file path
pub fn load_config(path: Option<&Path>) -> Result<super::AppConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
    read_config(config_path)
}

fn read_config(path: &Path) -> Result<super::AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading relay configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<super::AppConfig, ConfigError> {
    let model = parsed.model.ok_or(ConfigError::MissingModel)?;
    let default_provider = parsed
        .default_provider
        .ok_or(ConfigError::MissingDefaultProvider)?;

    if parsed.providers.is_empty() {
        return Err(ConfigError::NoProvidersConfigured);
    }

    let mut providers: Vec<ProviderConfig> = Vec::new();
    for raw_provider in parsed.providers {
        if raw_provider.endpoint.is_none() {
            return Err(ConfigError::MissingEndpoint {
                provider: raw_provider.id.clone(),
            });
        }
        providers.push(ProviderConfig::from(raw_provider));
    }
    if !providers.iter().any(|p| p.id == default_provider) {
        return Err(ConfigError::ProviderNotFound {
            provider: default_provider,
        });
    }
    if let Some(provider) = providers.iter_mut().find(|p| p.id == default_provider) {
        provider.ensure_model(&model);
    }

    let routing = match parsed.routing {
        Some(raw_routing) => Some(validate_routing(raw_routing, &model, &mut providers)?),
        None => None,
    };

    Ok(super::AppConfig {
        default_provider,
        model,
        system_prompt: parsed.system_prompt,
        providers,
        routing,
    })
}

fn validate_routing(
    raw: RawRoutingConfig,
    default_model: &str,
    providers: &mut [ProviderConfig],
) -> Result<RoutingConfig, ConfigError> {
    let strategy_name = raw.strategy.unwrap_or_else(|| "fallback".to_string());
    let strategy =
        RoutingStrategy::from_str(&strategy_name).ok_or(ConfigError::UnknownStrategy {
            strategy: strategy_name,
        })?;

    if raw.targets.is_empty() {
        return Err(ConfigError::NoRoutingTargets);
    }

    let mut targets: Vec<TargetConfig> = Vec::new();
    for raw_target in raw.targets {
        let Some(provider) = providers.iter_mut().find(|p| p.id == raw_target.provider) else {
            return Err(ConfigError::RoutingProviderNotFound {
                provider: raw_target.provider,
            });
        };

        let target = TargetConfig::from(raw_target);
        let model = match target.override_params.get("model") {
            Some(Value::String(model)) => model.as_str(),
            _ => target.model.as_deref().unwrap_or(default_model),
        };
        provider.ensure_model(model);
        targets.push(target);
    }

    Ok(RoutingConfig { strategy, targets })
}
