//! # Provider Configuration
//!
//! Configuration types for LLM backend providers. A provider entry is either
//! a direct OpenAI-compatible endpoint (Mistral, OpenAI, any compatible
//! server) or a routing gateway that forwards to a named upstream provider.
//!
//! ## Provider Types
//!
//! | Type | Description | API Key Required |
//! |------|-------------|-----------------|
//! | `openai` | OpenAI-compatible APIs, called directly | Yes |
//! | `gateway` | Routing gateway fronting named upstreams | Yes |

use serde::{Deserialize, Serialize};

/// Information about an available model from a provider.
///
/// Models can be specified with just a name, or with an optional display name
/// for better presentation in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelInfo {
    /// Model identifier used in API calls (e.g., "mistral-tiny")
    pub name: String,
    /// Human-readable display name (e.g., "Mistral Tiny")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Configuration for an LLM backend provider.
///
/// Each provider represents a connection to a model service endpoint.
/// Multiple providers can be configured and chained into a fallback route.
///
/// # Example
///
/// ```toml
/// [[providers]]
/// id = "mistral"
/// type = "openai"
/// endpoint = "https://api.mistral.ai"
/// api_key = "MISTRAL_API_KEY"
/// models = [
///     { name = "mistral-tiny", display_name = "Mistral Tiny" }
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Unique identifier for this provider (e.g., "mistral", "gw-openai")
    pub id: String,
    /// The provider type determines the client: "gateway" or "openai"
    #[serde(rename = "type")]
    pub provider_type: String,
    /// API endpoint URL
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API path override (e.g., "/v1/chat/completions")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
    /// Upstream provider handle a gateway routes to (e.g., "@test-openai").
    /// Defaults to `id` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// List of available models from this provider
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawProviderConfig {
    pub(super) id: String,
    #[serde(rename = "type", default)]
    pub(super) provider_type: String,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
    #[serde(default)]
    pub(super) handle: Option<String>,
    #[serde(default)]
    pub(super) models: Vec<RawModelInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum RawModelInfo {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        display_name: Option<String>,
    },
}

impl From<RawModelInfo> for ModelInfo {
    fn from(value: RawModelInfo) -> Self {
        match value {
            RawModelInfo::Name(name) => Self {
                name,
                display_name: None,
            },
            RawModelInfo::Detailed { name, display_name } => Self { name, display_name },
        }
    }
}

impl From<RawProviderConfig> for ProviderConfig {
    fn from(raw: RawProviderConfig) -> Self {
        let endpoint = raw.endpoint.unwrap_or_default();

        Self {
            id: raw.id,
            provider_type: raw.provider_type,
            endpoint,
            api_key: raw.api_key,
            api_path: raw.api_path,
            handle: raw.handle,
            models: raw.models.into_iter().map(ModelInfo::from).collect(),
        }
    }
}

impl ProviderConfig {
    /// Ensure a model exists in this provider's model list
    pub fn ensure_model(&mut self, model: &str) {
        if self.models.iter().all(|info| info.name != model) {
            self.models.push(ModelInfo {
                name: model.to_string(),
                display_name: None,
            });
        }
    }

    /// Check if this provider is a routing gateway (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use pharos_relay::config::ProviderConfig;
    ///
    /// let provider = ProviderConfig {
    ///     id: "gw-openai".to_string(),
    ///     provider_type: "GATEWAY".to_string(),
    ///     endpoint: "https://gateway.example.com".to_string(),
    ///     api_key: Some("RELAY_GATEWAY_API_KEY".to_string()),
    ///     api_path: None,
    ///     handle: Some("@test-openai".to_string()),
    ///     models: vec![],
    /// };
    /// assert!(provider.is_gateway());
    /// ```
    pub fn is_gateway(&self) -> bool {
        self.provider_type.eq_ignore_ascii_case("gateway")
    }

    /// The upstream handle a gateway routes to, falling back to the id.
    pub fn upstream_handle(&self) -> &str {
        self.handle.as_deref().unwrap_or(&self.id)
    }
}
