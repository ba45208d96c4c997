//! OpenAI Chat Completions adapter, plus the shared OpenAI-compatible wire
//! call used by the DeepSeek adapter.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, ModelTier};
use crate::config::{ApiKey, ProviderConfig};
use crate::error::{Error, Result, UpstreamError};
use crate::types::{AiResponse, Message, ProviderId, RequestOptions, Role, TokenUsage};

use super::read_json;

pub struct OpenAiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

impl OpenAiAdapter {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

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
        call_chat_completions(
            &self.client,
            &self.base_url,
            self.api_key.as_ref(),
            ProviderId::OpenAi,
            messages,
            options,
        )
        .await
    }
}

/// Perform one OpenAI-wire `POST {base}/chat/completions` round-trip and
/// normalize the reply. System-role messages travel inline on this wire; an
/// explicit system prompt is prepended as a system message.
pub(crate) async fn call_chat_completions(
    client: &reqwest::Client,
    base_url: &str,
    api_key: Option<&ApiKey>,
    provider: ProviderId,
    messages: &[Message],
    options: &RequestOptions,
) -> Result<AiResponse> {
    let model = options
        .model
        .clone()
        .unwrap_or_else(|| catalog::tier_model(provider, ModelTier::Default).to_string());

    match execute(client, base_url, api_key, provider, &model, messages, options).await {
        Ok(response) => Ok(response),
        Err(source) => Err(Error::Upstream {
            provider,
            model,
            source,
        }),
    }
}

async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    api_key: Option<&ApiKey>,
    provider: ProviderId,
    model: &str,
    messages: &[Message],
    options: &RequestOptions,
) -> std::result::Result<AiResponse, UpstreamError> {
    let mut wire_messages: Vec<ChatMessage> = Vec::with_capacity(messages.len() + 1);
    if let Some(prompt) = options.system_prompt.as_deref() {
        wire_messages.push(ChatMessage {
            role: "system",
            content: prompt,
        });
    }
    wire_messages.extend(messages.iter().map(|m| ChatMessage {
        role: match m.role {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        },
        content: &m.content,
    }));

    let body = ChatRequest {
        model,
        max_tokens: options.max_tokens(),
        temperature: options.temperature(),
        messages: wire_messages,
    };

    let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    tracing::debug!(provider = %provider, model = %model, url = %url, "Calling chat completions");

    let mut request = client.post(&url).json(&body);
    if let Some(api_key) = api_key {
        request = request.bearer_auth(api_key.expose_secret());
    }

    let reply: ChatResponse = read_json(request.send().await?).await?;

    // Usage is optional on this wire; absent counts bill as zero
    let usage = TokenUsage::new(reply.usage.prompt_tokens, reply.usage.completion_tokens);
    let price = catalog::resolve_price(provider, model);

    let content = reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    Ok(AiResponse {
        content,
        provider,
        model: model.to_string(),
        tokens_used: usage,
        cost: catalog::usage_cost(usage, price),
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}
