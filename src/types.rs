//! Core request and response types shared across the router and adapters.

use serde::{Deserialize, Serialize};

/// Default token budget applied when a request does not specify one.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
/// Default sampling temperature applied when a request does not specify one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single message in an ordered conversation.
///
/// Ordering is significant; adapters that require a separate system-prompt
/// field extract and merge `System` messages themselves.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// One of the four upstream providers.
///
/// Each covers a routing role: `Anthropic` for safety-sensitive content,
/// `OpenAi` for general/creative tasks, `DeepSeek` as the cost-efficient
/// reasoning default, `Gemini` for its multimodal chat abstraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Anthropic,
    OpenAi,
    DeepSeek,
    Gemini,
}

impl ProviderId {
    /// All providers, in a stable order.
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Anthropic,
        ProviderId::OpenAi,
        ProviderId::DeepSeek,
        ProviderId::Gemini,
    ];

    /// Lowercase identifier used in config sections, env vars, and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "anthropic",
            ProviderId::OpenAi => "openai",
            ProviderId::DeepSeek => "deepseek",
            ProviderId::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anthropic" => Ok(ProviderId::Anthropic),
            "openai" => Ok(ProviderId::OpenAi),
            "deepseek" => Ok(ProviderId::DeepSeek),
            "gemini" => Ok(ProviderId::Gemini),
            other => Err(format!(
                "unknown provider '{}' (expected anthropic, openai, deepseek, or gemini)",
                other
            )),
        }
    }
}

/// Per-request options. All fields are optional; absence triggers defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RequestOptions {
    /// Explicit provider choice. When set, the selector is never consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderId>,
    /// Concrete model override. Defaults to the provider's `default` tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum output tokens (default 4096).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature in [0, 2] (default 0.7).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Explicit system prompt, merged ahead of any system-role messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Present for wire compatibility; adapters always make a single
    /// non-streaming round-trip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl RequestOptions {
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Token counts reported by an upstream for one call.
///
/// `total` is derived, never stored independently of its parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenUsage {
    pub input: u32,
    pub output: u32,
}

impl TokenUsage {
    pub fn new(input: u32, output: u32) -> Self {
        Self { input, output }
    }

    pub fn total(&self) -> u32 {
        self.input + self.output
    }
}

/// Uniform response shape returned by every adapter.
///
/// `cost` is computed from the usage the upstream actually reported for this
/// call, in USD (prices are per million tokens); it is never estimated from
/// the requested token budget.
#[derive(Debug, Clone, Serialize)]
pub struct AiResponse {
    pub content: String,
    pub provider: ProviderId,
    pub model: String,
    pub tokens_used: TokenUsage,
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_usage_total_is_derived() {
        let usage = TokenUsage::new(10, 40);
        assert_eq!(usage.total(), 50);
        assert_eq!(TokenUsage::default().total(), 0);
    }

    #[test]
    fn options_defaults() {
        let options = RequestOptions::default();
        assert_eq!(options.max_tokens(), 4096);
        assert_eq!(options.temperature(), 0.7);
        assert!(options.provider.is_none());
        assert!(options.model.is_none());
    }

    #[test]
    fn provider_id_round_trips_through_str() {
        for provider in ProviderId::ALL {
            let parsed: ProviderId = provider.as_str().parse().unwrap();
            assert_eq!(parsed, provider);
        }
        assert!("mistral".parse::<ProviderId>().is_err());
    }

    #[test]
    fn provider_id_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProviderId::OpenAi).unwrap(),
            "\"openai\""
        );
        let parsed: ProviderId = serde_json::from_str("\"deepseek\"").unwrap();
        assert_eq!(parsed, ProviderId::DeepSeek);
    }

    #[test]
    fn role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        let message: Message = serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
        assert_eq!(message.role, Role::User);
    }
}
