//! Routing configuration: the `[routing]` table maps to a strategy and an
//! ordered target chain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::routing::{ProviderTarget, RoutingStrategy};

/// One `[[routing.targets]]` entry.
///
/// `model` falls back to the top-level default model when absent; a
/// `"model"` key inside `override_params` wins over both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub override_params: BTreeMap<String, Value>,
}

/// Validated `[routing]` section.
///
/// # Example
///
/// ```toml
/// [routing]
/// strategy = "fallback"
///
/// [[routing.targets]]
/// provider = "gw-openai"
/// override_params = { model = "gpt-4o" }
///
/// [[routing.targets]]
/// provider = "gw-mistral"
/// override_params = { model = "mistral-tiny" }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    pub strategy: RoutingStrategy,
    pub targets: Vec<TargetConfig>,
}

impl RoutingConfig {
    /// Build the dispatchable target chain, resolving absent models to the
    /// configured default.
    pub fn to_targets(&self, default_model: &str) -> Vec<ProviderTarget> {
        self.targets
            .iter()
            .map(|entry| {
                let model = entry.model.as_deref().unwrap_or(default_model);
                let mut target = ProviderTarget::new(&entry.provider, model);
                for (key, value) in &entry.override_params {
                    target = target.with_param(key.as_str(), value.clone());
                }
                target
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawRoutingConfig {
    #[serde(default)]
    pub(super) strategy: Option<String>,
    #[serde(default)]
    pub(super) targets: Vec<RawTargetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawTargetConfig {
    pub(super) provider: String,
    #[serde(default)]
    pub(super) model: Option<String>,
    #[serde(default)]
    pub(super) override_params: BTreeMap<String, Value>,
}

impl From<RawTargetConfig> for TargetConfig {
    fn from(raw: RawTargetConfig) -> Self {
        Self {
            provider: raw.provider,
            model: raw.model,
            override_params: raw.override_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn targets_fall_back_to_the_default_model() {
        let routing = RoutingConfig {
            strategy: RoutingStrategy::Fallback,
            targets: vec![
                TargetConfig {
                    provider: "mistral".to_string(),
                    model: None,
                    override_params: BTreeMap::new(),
                },
                TargetConfig {
                    provider: "gw-openai".to_string(),
                    model: Some("gpt-4.1".to_string()),
                    override_params: BTreeMap::from([("model".to_string(), json!("gpt-4o"))]),
                },
            ],
        };

        let targets = routing.to_targets("mistral-tiny");
        assert_eq!(targets[0].effective_model(), "mistral-tiny");
        assert_eq!(targets[1].effective_model(), "gpt-4o");
    }
}
