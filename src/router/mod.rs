//! Routing engine: selector -> adapter -> uniform response.
//!
//! One round-trip per request, no retries, no cross-provider fallback. If
//! the chosen provider fails, the failure is terminal for that request; a
//! caller wanting a second opinion re-invokes with an explicit provider.
//! Automatic fallback would hide cost and behavioral differences between
//! providers from the caller.

mod selector;

pub use selector::{Classify, KeywordClassifier};

use crate::config::Config;
use crate::error::Result;
use crate::providers::{AnthropicAdapter, DeepSeekAdapter, GeminiAdapter, OpenAiAdapter};
use crate::types::{AiResponse, Message, ProviderId, RequestOptions};

/// Routes conversations to one of four provider adapters.
///
/// Adapters are constructed once with injected HTTP clients and are
/// immutable afterwards; `Router` is `Send + Sync` and shares freely behind
/// an `Arc`, with no engine-level concurrency limit.
pub struct Router {
    anthropic: AnthropicAdapter,
    openai: OpenAiAdapter,
    deepseek: DeepSeekAdapter,
    gemini: GeminiAdapter,
    classifier: Box<dyn Classify>,
}

impl Router {
    /// Build a router from configuration with the default keyword classifier.
    pub fn from_config(config: &Config) -> Self {
        Self::with_classifier(config, Box::new(KeywordClassifier::new()))
    }

    /// Build a router with a custom classification strategy.
    pub fn with_classifier(config: &Config, classifier: Box<dyn Classify>) -> Self {
        let client = reqwest::Client::new();
        Self {
            anthropic: AnthropicAdapter::new(client.clone(), &config.providers.anthropic),
            openai: OpenAiAdapter::new(client.clone(), &config.providers.openai),
            deepseek: DeepSeekAdapter::new(client.clone(), &config.providers.deepseek),
            gemini: GeminiAdapter::new(client, &config.providers.gemini),
            classifier,
        }
    }

    /// Pick a provider from conversation content alone.
    ///
    /// Total and deterministic: classifies the last message with non-empty
    /// content, or the empty string for an empty conversation (which lands
    /// on the cost-efficient default).
    pub fn select(&self, messages: &[Message]) -> ProviderId {
        let text = messages
            .iter()
            .rev()
            .find(|m| !m.content.is_empty())
            .map(|m| m.content.as_str())
            .unwrap_or("");
        self.classifier.classify(text)
    }

    /// Route a conversation: resolve the provider, dispatch to its adapter,
    /// and return the adapter's response unchanged.
    pub async fn route(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<AiResponse> {
        // Explicit provider always wins; the selector is only consulted
        // when no provider is given.
        let provider = options.provider.unwrap_or_else(|| self.select(messages));

        tracing::info!(
            provider = %provider,
            explicit = options.provider.is_some(),
            messages = messages.len(),
            "Routing request"
        );

        match provider {
            ProviderId::Anthropic => self.anthropic.call(messages, options).await,
            ProviderId::OpenAi => self.openai.call(messages, options).await,
            ProviderId::DeepSeek => self.deepseek.call(messages, options).await,
            ProviderId::Gemini => self.gemini.call(messages, options).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_router() -> Router {
        Router::from_config(&Config::default())
    }

    #[test]
    fn select_is_total_on_empty_conversation() {
        let router = test_router();
        assert_eq!(router.select(&[]), ProviderId::DeepSeek);
    }

    #[test]
    fn select_uses_last_non_empty_message() {
        let router = test_router();
        let messages = vec![
            Message::user("Napisz wiersz"),
            Message::user("diagnoza"),
            Message::user(""),
        ];
        // The empty trailing message is skipped; the medical keyword wins
        assert_eq!(router.select(&messages), ProviderId::Anthropic);
    }

    #[test]
    fn select_ignores_earlier_messages() {
        let router = test_router();
        let messages = vec![
            Message::user("diagnoza lekarska"),
            Message::assistant("..."),
            Message::user("napisz piosenkę"),
        ];
        assert_eq!(router.select(&messages), ProviderId::OpenAi);
    }

    struct FixedClassifier(ProviderId);

    impl Classify for FixedClassifier {
        fn classify(&self, _text: &str) -> ProviderId {
            self.0
        }
    }

    #[test]
    fn custom_classifier_is_pluggable() {
        let router = Router::with_classifier(
            &Config::default(),
            Box::new(FixedClassifier(ProviderId::Gemini)),
        );
        assert_eq!(router.select(&[Message::user("anything")]), ProviderId::Gemini);
    }
}
