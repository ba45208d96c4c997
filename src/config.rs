//! Configuration parsing and validation for modelmux.
//!
//! Credentials come from a TOML file, from `${VAR}` references expanded
//! against the environment, or from convention env vars when no file entry
//! exists. A provider without a key is not a configuration error; it simply
//! sends no auth header and fails upstream if actually called.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

use crate::types::ProviderId;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-provider configuration sections; the provider set is closed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub deepseek: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, provider: ProviderId) -> &ProviderConfig {
        match provider {
            ProviderId::Anthropic => &self.anthropic,
            ProviderId::OpenAi => &self.openai,
            ProviderId::DeepSeek => &self.deepseek,
            ProviderId::Gemini => &self.gemini,
        }
    }
}

/// Configuration for one upstream provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    /// API key; may be omitted in favor of convention env vars.
    pub api_key: Option<ApiKey>,
    /// Override for the provider's API base URL (also the test seam).
    pub base_url: Option<String>,
}

/// API key wrapper that redacts in Debug/Display/Serialize and zeroizes on drop.
///
/// The inner `SecretString` ensures the key value is never exposed via Debug
/// or Display and is only accessible via `.expose_secret()`, which keeps
/// every access grep-auditable.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Access the raw key value. Every call site is auditable via `grep expose_secret`.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> serde::Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| ApiKey(SecretString::from(s)))
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(SecretString::from(s))
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey(SecretString::from(s))
    }
}

/// How a provider's API key was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    /// Key was a literal string in config (no ${} references)
    Literal,
    /// Key contained ${VAR} references expanded from environment
    EnvExpanded,
    /// Key was auto-discovered from a convention env var (holds var name)
    Convention(String),
    /// No key available
    None,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Literal => write!(f, "config-literal"),
            KeySource::EnvExpanded => write!(f, "env-expanded"),
            KeySource::Convention(var) => write!(f, "convention ({})", var),
            KeySource::None => write!(f, "none"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable '{var}' not set for provider '{provider}': {message}")]
    EnvVar {
        var: String,
        provider: ProviderId,
        message: String,
    },
}

/// Provider config deserialized directly from TOML.
/// api_key is `Option<String>` so it may contain `${VAR}` references not yet expanded.
#[derive(Debug, Default, Deserialize)]
pub struct RawProviderConfig {
    api_key: Option<String>,
    base_url: Option<String>,
}

/// Configuration deserialized directly from TOML, before key resolution.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    providers: RawProvidersConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawProvidersConfig {
    #[serde(default)]
    anthropic: RawProviderConfig,
    #[serde(default)]
    openai: RawProviderConfig,
    #[serde(default)]
    deepseek: RawProviderConfig,
    #[serde(default)]
    gemini: RawProviderConfig,
}

/// Expand all `${VAR}` references in a string using a custom lookup function.
///
/// The closure-based design makes this testable without touching global env
/// state. Supports multiple `${VAR}` in one string. Fails on first missing
/// variable, unclosed `${`, or empty variable name.
fn expand_env_vars_with<F>(
    input: &str,
    provider: ProviderId,
    lookup: F,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains("${") {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find('}').ok_or_else(|| ConfigError::EnvVar {
            var: "<unclosed>".to_string(),
            provider,
            message: format!("Unclosed '${{' in config value: {}", input),
        })?;

        let var_name = &after[..end];
        if var_name.is_empty() {
            return Err(ConfigError::EnvVar {
                var: "".to_string(),
                provider,
                message: "Empty variable name in '${}' reference".to_string(),
            });
        }

        let value = lookup(var_name).ok_or_else(|| ConfigError::EnvVar {
            var: var_name.to_string(),
            provider,
            message: format!(
                "Environment variable '{}' is not set (referenced for provider '{}')",
                var_name, provider
            ),
        })?;

        result.push_str(&value);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Derive the crate-prefixed convention env var name for a provider.
///
/// - anthropic -> "MODELMUX_ANTHROPIC_API_KEY"
/// - deepseek  -> "MODELMUX_DEEPSEEK_API_KEY"
pub fn convention_env_var_name(provider: ProviderId) -> String {
    format!("MODELMUX_{}_API_KEY", provider.as_str().to_uppercase())
}

/// Vendor-standard env var each upstream SDK conventionally reads.
pub fn vendor_env_var_name(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::Anthropic => "ANTHROPIC_API_KEY",
        ProviderId::OpenAi => "OPENAI_API_KEY",
        ProviderId::DeepSeek => "DEEPSEEK_API_KEY",
        ProviderId::Gemini => "GOOGLE_AI_API_KEY",
    }
}

/// Resolve a provider's API key from its raw config value and an env lookup.
///
/// - `${VAR}` references: expanded, source = `EnvExpanded`
/// - literal string: wrapped directly, source = `Literal`
/// - absent: convention lookup, `MODELMUX_<P>_API_KEY` first, then the
///   vendor-standard variable; source = `Convention(var)` or `None`
fn resolve_key_with<F>(
    raw_key: Option<&str>,
    provider: ProviderId,
    lookup: F,
) -> Result<(Option<ApiKey>, KeySource), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match raw_key {
        Some(raw) if raw.contains("${") => {
            let expanded = expand_env_vars_with(raw, provider, &lookup)?;
            Ok((Some(ApiKey::from(expanded)), KeySource::EnvExpanded))
        }
        Some(raw) => Ok((Some(ApiKey::from(raw)), KeySource::Literal)),
        None => {
            for var_name in [
                convention_env_var_name(provider),
                vendor_env_var_name(provider).to_string(),
            ] {
                if let Some(value) = lookup(&var_name) {
                    return Ok((Some(ApiKey::from(value)), KeySource::Convention(var_name)));
                }
            }
            Ok((None, KeySource::None))
        }
    }
}

impl Config {
    /// Parse configuration from a TOML string, resolving keys against the
    /// provided env lookup. Returns the config and per-provider key sources.
    pub fn parse_str_with<F>(
        content: &str,
        lookup: F,
    ) -> Result<(Self, Vec<(ProviderId, KeySource)>), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw: RawConfig = toml::from_str(content)?;
        Self::from_raw_with(raw, lookup)
    }

    /// Parse configuration from a TOML string using real environment variables.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse_str_with(content, |name| std::env::var(name).ok()).map(|(config, _)| config)
    }

    /// Load configuration from a TOML file with environment variable
    /// expansion and convention key lookup.
    pub fn from_file(
        path: impl AsRef<Path>,
    ) -> Result<(Self, Vec<(ProviderId, KeySource)>), ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;
        Self::parse_str_with(&content, |name| std::env::var(name).ok())
    }

    /// Build a configuration purely from environment variables (no file).
    pub fn from_env() -> Result<(Self, Vec<(ProviderId, KeySource)>), ConfigError> {
        Self::from_raw_with(RawConfig::default(), |name| std::env::var(name).ok())
    }

    /// Convert raw (deserialized) config to final config, resolving each
    /// provider's key via the convention chain.
    fn from_raw_with<F>(
        raw: RawConfig,
        lookup: F,
    ) -> Result<(Self, Vec<(ProviderId, KeySource)>), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut providers = ProvidersConfig::default();
        let mut key_sources = Vec::with_capacity(ProviderId::ALL.len());

        let entries = [
            (ProviderId::Anthropic, raw.providers.anthropic),
            (ProviderId::OpenAi, raw.providers.openai),
            (ProviderId::DeepSeek, raw.providers.deepseek),
            (ProviderId::Gemini, raw.providers.gemini),
        ];

        for (provider, raw_provider) in entries {
            let (api_key, source) =
                resolve_key_with(raw_provider.api_key.as_deref(), provider, &lookup)?;
            key_sources.push((provider, source));

            let resolved = ProviderConfig {
                api_key,
                base_url: raw_provider.base_url,
            };
            match provider {
                ProviderId::Anthropic => providers.anthropic = resolved,
                ProviderId::OpenAi => providers.openai = resolved,
                ProviderId::DeepSeek => providers.deepseek = resolved,
                ProviderId::Gemini => providers.gemini = resolved,
            }
        }

        let config = Config {
            providers,
            logging: raw.logging,
        };
        config.validate()?;

        Ok((config, key_sources))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for provider in ProviderId::ALL {
            if let Some(url) = &self.providers.get(provider).base_url {
                if url.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "Provider '{}' has empty base_url",
                        provider
                    )));
                }
            }
        }
        Ok(())
    }
}
