//! modelmux - Multi-provider AI routing and cost accounting
//!
//! This library routes a conversation to one of four upstream AI providers
//! (Anthropic, OpenAI, DeepSeek, Gemini), normalizes their wire protocols
//! into a single response shape, and prices each call from the token usage
//! the upstream actually reported.

pub mod catalog;
pub mod config;
pub mod error;
pub mod providers;
pub mod router;
pub mod types;

pub use config::Config;
pub use error::{Error, Result, UpstreamError};
pub use router::{Classify, KeywordClassifier, Router};
pub use types::{AiResponse, Message, ProviderId, RequestOptions, Role, TokenUsage};
