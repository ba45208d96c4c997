//! Provider adapters.
//!
//! Each adapter translates the internal message list and options into one
//! upstream's native call shape, performs a single round-trip, and
//! normalizes the raw reply into [`AiResponse`](crate::types::AiResponse).
//! No caller-visible branching on provider type leaks past this layer.

mod anthropic;
mod deepseek;
mod gemini;
mod openai;

pub use anthropic::AnthropicAdapter;
pub use deepseek::DeepSeekAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

use serde::de::DeserializeOwned;

use crate::error::UpstreamError;
use crate::types::{Message, RequestOptions, Role};

/// Merge the explicit system prompt and all system-role message contents
/// into a single system string, newline-separated. `None` when there is
/// nothing to send, so adapters can omit the field entirely.
pub(crate) fn merged_system(messages: &[Message], options: &RequestOptions) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(prompt) = options.system_prompt.as_deref() {
        parts.push(prompt);
    }
    parts.extend(
        messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str()),
    );
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Conversational (non-system) messages, in order.
pub(crate) fn conversation(messages: &[Message]) -> impl Iterator<Item = &Message> {
    messages.iter().filter(|m| m.role != Role::System)
}

/// Read an upstream reply: non-2xx becomes `Status` with the body attached,
/// an undecodable body becomes `Payload`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(UpstreamError::Status { status, body });
    }
    serde_json::from_str(&body).map_err(|e| UpstreamError::Payload(e.to_string()))
}
