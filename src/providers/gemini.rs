//! Google Gemini generateContent adapter.
//!
//! Gemini's native abstraction is a chat session: every message except the
//! last becomes reconstructed history (`assistant` mapped to the `model`
//! role, everything else to `user`), and the last message's content is
//! submitted as the new turn. The other adapters send the full list; this
//! shape must be preserved.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, ModelTier};
use crate::config::{ApiKey, ProviderConfig};
use crate::error::{Error, Result, UpstreamError};
use crate::types::{AiResponse, Message, ProviderId, RequestOptions, Role, TokenUsage};

use super::read_json;

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

impl GeminiAdapter {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

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
            .unwrap_or_else(|| catalog::tier_model(ProviderId::Gemini, ModelTier::Default).to_string());

        match self.execute(&model, messages, options).await {
            Ok(response) => Ok(response),
            Err(source) => Err(Error::Upstream {
                provider: ProviderId::Gemini,
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
        let body = GenerateContentRequest {
            contents: build_contents(messages),
            system_instruction: options.system_prompt.as_deref().map(|text| SystemInstruction {
                parts: vec![Part { text }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: options.max_tokens(),
                temperature: options.temperature(),
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );
        tracing::debug!(model = %model, url = %url, "Calling Gemini");

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-goog-api-key", api_key.expose_secret());
        }

        let reply: GenerateContentResponse = read_json(request.send().await?).await?;

        let usage = TokenUsage::new(
            reply.usage_metadata.prompt_token_count,
            reply.usage_metadata.candidates_token_count,
        );
        let price = catalog::resolve_price(ProviderId::Gemini, model);

        // No candidates or no text parts (e.g. a safety block) is empty output
        let content = reply
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(AiResponse {
            content,
            provider: ProviderId::Gemini,
            model: model.to_string(),
            tokens_used: usage,
            cost: catalog::usage_cost(usage, price),
        })
    }
}

/// History from all messages but the last (`assistant` becomes the `model`
/// role, everything else `user`), then the last message's content as the new
/// `user` turn. An empty conversation submits one empty turn.
fn build_contents(messages: &[Message]) -> Vec<Content<'_>> {
    let (turn, history) = match messages.split_last() {
        Some((last, rest)) => (last.content.as_str(), rest),
        None => ("", &[][..]),
    };

    let mut contents: Vec<Content> = history
        .iter()
        .map(|m| Content {
            role: match m.role {
                Role::Assistant => "model",
                _ => "user",
            },
            parts: vec![Part { text: &m.content }],
        })
        .collect();
    contents.push(Content {
        role: "user",
        parts: vec![Part { text: turn }],
    });
    contents
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: UsageMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Default, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}
