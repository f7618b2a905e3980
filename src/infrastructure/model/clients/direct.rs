//! Direct OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::DEFAULT_CHAT_API_PATH;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};
use crate::infrastructure::model::wire::WireFormat;

/// Direct client for OpenAI-compatible APIs (works with Mistral, OpenAI,
/// Groq, and any compatible server)
#[derive(Clone)]
pub struct DirectClient {
    base: HttpClientBase,
    api_path: String,
}

impl DirectClient {
    pub fn from_config(config: &ProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_CHAT_API_PATH.to_string()),
        }
    }
}

#[async_trait]
impl ModelClient for DirectClient {
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

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: ChatCompletionResponse = self.base.post_with_bearer(&url, &payload).await?;
        debug!("Received response from OpenAI-compatible provider");

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
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: Option<ChatCompletionMessage>,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: String,
}
