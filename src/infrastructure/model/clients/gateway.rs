//! Routing-gateway client implementation
//!
//! Speaks the same chat-completions wire format as the direct client, but
//! addresses a gateway that forwards to a named upstream provider. The
//! upstream handle travels in a routing header, the dispatch trace id in a
//! trace header.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::{DEFAULT_CHAT_API_PATH, GATEWAY_PROVIDER_HEADER, GATEWAY_TRACE_HEADER};
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};
use crate::infrastructure::model::wire::WireFormat;

/// Client for a routing gateway fronting named upstream providers
#[derive(Clone)]
pub struct GatewayClient {
    base: HttpClientBase,
    api_path: String,
    upstream_handle: String,
}

impl GatewayClient {
    pub fn from_config(config: &ProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_CHAT_API_PATH.to_string()),
            upstream_handle: config.upstream_handle().to_string(),
        }
    }
}

#[async_trait]
impl ModelClient for GatewayClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn send(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(&self.api_path);

        let mut payload = json!({
            "model": request.model,
            "messages": WireFormat::to_chat_messages(&request.messages),
            "stream": false,
        });
        WireFormat::apply_params(&mut payload, &request.params);

        let headers = [
            (GATEWAY_PROVIDER_HEADER, self.upstream_handle.clone()),
            (GATEWAY_TRACE_HEADER, request.trace_id.to_string()),
        ];

        info!(
            provider = self.base.id.as_str(),
            upstream = self.upstream_handle.as_str(),
            model = request.model.as_str(),
            trace_id = %request.trace_id,
            "Sending request through routing gateway"
        );

        let response: GatewayChatResponse =
            self.base.post_with_headers(&url, &headers, &payload).await?;
        debug!("Received response from routing gateway");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing content"))?;

        Ok(ModelResponse::new(content))
    }
}

#[derive(Deserialize)]
struct GatewayChatResponse {
    choices: Vec<GatewayChoice>,
}

#[derive(Deserialize)]
struct GatewayChoice {
    message: Option<GatewayMessage>,
}

#[derive(Deserialize)]
struct GatewayMessage {
    content: String,
}
