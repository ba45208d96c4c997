//! Model tiers and the static cost table.
//!
//! Prices are USD per million tokens and ship with the crate as versioned
//! configuration data; they are not refreshed at runtime. A model missing
//! from the table bills at its provider's default pair — an approximation
//! that favors availability over precision, not a billing-grade guarantee.

use crate::types::{ProviderId, TokenUsage};

/// Named quality/cost preset within a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Default,
    Fast,
    Powerful,
}

impl ModelTier {
    pub const ALL: [ModelTier; 3] = [ModelTier::Default, ModelTier::Fast, ModelTier::Powerful];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Default => "default",
            ModelTier::Fast => "fast",
            ModelTier::Powerful => "powerful",
        }
    }
}

/// Concrete model identifier for a provider tier.
pub fn tier_model(provider: ProviderId, tier: ModelTier) -> &'static str {
    match (provider, tier) {
        (ProviderId::Anthropic, ModelTier::Default) => "claude-sonnet-4-20250514",
        (ProviderId::Anthropic, ModelTier::Fast) => "claude-3-5-haiku-20241022",
        (ProviderId::Anthropic, ModelTier::Powerful) => "claude-sonnet-4-20250514",
        (ProviderId::OpenAi, ModelTier::Default) => "gpt-4o",
        (ProviderId::OpenAi, ModelTier::Fast) => "gpt-4o-mini",
        (ProviderId::OpenAi, ModelTier::Powerful) => "gpt-4o",
        (ProviderId::DeepSeek, ModelTier::Default) => "deepseek-chat",
        (ProviderId::DeepSeek, ModelTier::Fast) => "deepseek-chat",
        (ProviderId::DeepSeek, ModelTier::Powerful) => "deepseek-reasoner",
        (ProviderId::Gemini, ModelTier::Default) => "gemini-1.5-pro",
        (ProviderId::Gemini, ModelTier::Fast) => "gemini-1.5-flash",
        (ProviderId::Gemini, ModelTier::Powerful) => "gemini-1.5-pro",
    }
}

/// Per-million-token USD price pair for a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    pub input: f64,
    pub output: f64,
}

/// Static price table keyed by model identifier.
const TOKEN_COSTS: &[(&str, Price)] = &[
    ("claude-sonnet-4-20250514", Price { input: 3.0, output: 15.0 }),
    ("claude-3-5-haiku-20241022", Price { input: 0.25, output: 1.25 }),
    ("gpt-4o", Price { input: 2.5, output: 10.0 }),
    ("gpt-4o-mini", Price { input: 0.15, output: 0.6 }),
    ("deepseek-chat", Price { input: 0.14, output: 0.28 }),
    ("deepseek-reasoner", Price { input: 0.55, output: 2.19 }),
    ("gemini-1.5-pro", Price { input: 1.25, output: 5.0 }),
    ("gemini-1.5-flash", Price { input: 0.075, output: 0.3 }),
];

/// Look up a model's price pair in the static table.
pub fn model_price(model: &str) -> Option<Price> {
    TOKEN_COSTS
        .iter()
        .find(|(id, _)| *id == model)
        .map(|(_, price)| *price)
}

/// Fallback price pair used when a model has no table entry.
pub fn provider_default_price(provider: ProviderId) -> Price {
    match provider {
        ProviderId::Anthropic => Price { input: 3.0, output: 15.0 },
        ProviderId::OpenAi => Price { input: 2.5, output: 10.0 },
        ProviderId::DeepSeek => Price { input: 0.14, output: 0.28 },
        ProviderId::Gemini => Price { input: 1.25, output: 5.0 },
    }
}

/// Resolve the price pair for a billed model.
///
/// A lookup miss is never an error: the provider's default pair is used and
/// a warning is emitted so the approximation is visible in logs.
pub fn resolve_price(provider: ProviderId, model: &str) -> Price {
    match model_price(model) {
        Some(price) => price,
        None => {
            tracing::warn!(
                provider = %provider,
                model = %model,
                "Model missing from cost table, billing at provider default rates"
            );
            provider_default_price(provider)
        }
    }
}

/// Cost in USD for the given usage at the given per-million-token prices.
pub fn usage_cost(usage: TokenUsage, price: Price) -> f64 {
    (f64::from(usage.input) * price.input + f64::from(usage.output) * price.output) / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_model_has_a_price() {
        for provider in ProviderId::ALL {
            for tier in ModelTier::ALL {
                let model = tier_model(provider, tier);
                assert!(
                    model_price(model).is_some(),
                    "tier model '{}' missing from cost table",
                    model
                );
            }
        }
    }

    #[test]
    fn known_model_price() {
        let price = model_price("gpt-4o").unwrap();
        assert_eq!(price.input, 2.5);
        assert_eq!(price.output, 10.0);
    }

    #[test]
    fn unknown_model_falls_back_to_provider_default() {
        assert!(model_price("gpt-5-experimental").is_none());
        let price = resolve_price(ProviderId::OpenAi, "gpt-5-experimental");
        assert_eq!(price, provider_default_price(ProviderId::OpenAi));
    }

    #[test]
    fn cost_arithmetic() {
        // 10 input at 2.5 + 40 output at 10 per million
        let cost = usage_cost(TokenUsage::new(10, 40), Price { input: 2.5, output: 10.0 });
        assert!((cost - 0.000425).abs() < 1e-12);
    }

    #[test]
    fn zero_usage_costs_nothing() {
        let price = provider_default_price(ProviderId::Anthropic);
        assert_eq!(usage_cost(TokenUsage::default(), price), 0.0);
    }
}
