//! Wire-format conversion for OpenAI-compatible chat APIs

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::domain::types::{ChatMessage, ContentPart, MessageContent};

/// Keys owned by the client; parameter overrides never replace them
const RESERVED_KEYS: [&str; 3] = ["model", "messages", "stream"];

/// Converts domain messages and params to the OpenAI-compatible wire shape
pub struct WireFormat;

impl WireFormat {
    /// Convert messages to the chat-completions format.
    /// Returns: [{"role": "...", "content": "..." | [parts]}]
    pub fn to_chat_messages(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": Self::content_value(&msg.content)
                })
            })
            .collect()
    }

    /// Merge request params into a JSON request body, leaving reserved keys
    /// untouched
    pub fn apply_params(body: &mut Value, params: &BTreeMap<String, Value>) {
        let Some(object) = body.as_object_mut() else {
            return;
        };
        for (key, value) in params {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            object.insert(key.clone(), value.clone());
        }
    }

    fn content_value(content: &MessageContent) -> Value {
        match content {
            MessageContent::Text(text) => Value::String(text.clone()),
            MessageContent::Parts(parts) => Value::Array(
                parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => json!({
                            "type": "text",
                            "text": text
                        }),
                        ContentPart::ImageUrl { url } => json!({
                            "type": "image_url",
                            "image_url": {"url": url}
                        }),
                    })
                    .collect(),
            ),
        }
    }
}
