//! Routing data model: provider targets and the routing strategy.

use std::collections::BTreeMap;

use serde_json::Value;

/// How a dispatch call iterates its targets.
///
/// `Fallback` tries targets strictly in list order and stops at the first
/// success. Other policies (round-robin, latency-based) would be new
/// variants; the dispatcher's external contract does not change with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingStrategy {
    #[default]
    Fallback,
}

impl RoutingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingStrategy::Fallback => "fallback",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "fallback" => Some(RoutingStrategy::Fallback),
            _ => None,
        }
    }
}

/// One attemptable backend: a provider handle, a model, and optional
/// per-attempt parameter overrides. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTarget {
    provider: String,
    model: String,
    override_params: BTreeMap<String, Value>,
}

impl ProviderTarget {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            override_params: BTreeMap::new(),
        }
    }

    /// Add a parameter override for this target's attempts. A `"model"`
    /// override (string value) replaces the target's model.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.override_params.insert(key.into(), value.into());
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn override_params(&self) -> &BTreeMap<String, Value> {
        &self.override_params
    }

    /// Model used for this target's attempt: a string `"model"` override
    /// wins over the base model; any other value type is ignored.
    pub fn effective_model(&self) -> &str {
        match self.override_params.get("model") {
            Some(Value::String(model)) => model,
            _ => &self.model,
        }
    }

    /// Parameters sent with this target's attempt. The `"model"` key is
    /// stripped; it is already resolved via [`Self::effective_model`].
    pub fn attempt_params(&self) -> BTreeMap<String, Value> {
        self.override_params
            .iter()
            .filter(|(key, _)| key.as_str() != "model")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
