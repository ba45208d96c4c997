//! Anthropic Messages API adapter.
//!
//! System-role messages do not travel in the message list here: the API
//! takes a dedicated `system` field, so they are extracted and merged.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, ModelTier};
use crate::config::{ApiKey, ProviderConfig};
use crate::error::{Error, Result, UpstreamError};
use crate::types::{AiResponse, Message, ProviderId, RequestOptions, Role, TokenUsage};

use super::{conversation, merged_system, read_json};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

impl AnthropicAdapter {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";

    pub fn new(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn call(&self, messages: &[Message], options: &RequestOptions) -> Result<AiResponse> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| catalog::tier_model(ProviderId::Anthropic, ModelTier::Default).to_string());

        match self.execute(&model, messages, options).await {
            Ok(response) => Ok(response),
            Err(source) => Err(Error::Upstream {
                provider: ProviderId::Anthropic,
                model,
                source,
            }),
        }
    }

    async fn execute(
        &self,
        model: &str,
        messages: &[Message],
        options: &RequestOptions,
    ) -> std::result::Result<AiResponse, UpstreamError> {
        let body = MessagesRequest {
            model,
            max_tokens: options.max_tokens(),
            temperature: options.temperature(),
            system: merged_system(messages, options),
            messages: conversation(messages)
                .map(|m| WireMessage {
                    role: match m.role {
                        Role::Assistant => "assistant",
                        _ => "user",
                    },
                    content: &m.content,
                })
                .collect(),
        };

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        tracing::debug!(model = %model, url = %url, "Calling Anthropic");

        let mut request = self
            .client
            .post(&url)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key.expose_secret());
        }

        let reply: MessagesResponse = read_json(request.send().await?).await?;

        let usage = TokenUsage::new(reply.usage.input_tokens, reply.usage.output_tokens);
        let price = catalog::resolve_price(ProviderId::Anthropic, model);

        // A reply without a text block (e.g. a refusal) is empty, not an error
        let content = reply
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .unwrap_or_default();

        Ok(AiResponse {
            content,
            provider: ProviderId::Anthropic,
            model: model.to_string(),
            tokens_used: usage,
            cost: catalog::usage_cost(usage, price),
        })
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}
