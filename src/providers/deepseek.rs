//! DeepSeek adapter.
//!
//! DeepSeek speaks the OpenAI-compatible wire, so this adapter is the shared
//! chat-completions call pointed at a different base URL, with its own
//! default model and fallback price pair.

use crate::config::{ApiKey, ProviderConfig};
use crate::error::Result;
use crate::types::{AiResponse, Message, ProviderId, RequestOptions};

use super::openai::call_chat_completions;

pub struct DeepSeekAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

impl DeepSeekAdapter {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.deepseek.com/v1";

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
            ProviderId::DeepSeek,
            messages,
            options,
        )
        .await
    }
}
