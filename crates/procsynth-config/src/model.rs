use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use procsynth_utils::types::ConfigSource;

/// Total primary attempts allowed while the provider keeps answering 429
pub const DEFAULT_MAX_RATE_LIMIT_ATTEMPTS: u32 = 3;

/// Backoff base; the delay before attempt `n + 1` is `base * 2^(n-1)`
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Per external call
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_FALLBACK_PROVIDER: &str = "huggingface";

/// Provider names accepted in `[llm]`. `none` disables external generation.
pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "huggingface", "none"];

/// Configuration for procsynth operations.
///
/// # Configuration File Format
///
/// ```toml
/// [generation]
/// max_rate_limit_attempts = 3
/// base_delay_ms = 1000
/// call_timeout_secs = 60
///
/// [llm]
/// provider = "openai"
/// fallback_provider = "huggingface"
///
/// [llm.openai]
/// api_key_env = "OPENAI_API_KEY"
/// model = "gpt-3.5-turbo"
/// ```
///
/// # Source Attribution
///
/// Each resolved value records where it came from (`cli`, `config`,
/// `programmatic`, or `default`) for `procsynth config`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Retry, backoff and timeout policy for external generators.
    pub generation: GenerationConfig,
    /// Provider selection and per-provider settings.
    pub llm: LlmConfig,
    /// Source attribution for each setting.
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// Retry/backoff policy for the generation orchestrator
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub max_rate_limit_attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub call_timeout_secs: Option<u64>,
}

impl GenerationConfig {
    #[must_use]
    pub fn max_rate_limit_attempts(&self) -> u32 {
        self.max_rate_limit_attempts
            .unwrap_or(DEFAULT_MAX_RATE_LIMIT_ATTEMPTS)
    }

    #[must_use]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms.unwrap_or(DEFAULT_BASE_DELAY_MS))
    }

    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs.unwrap_or(DEFAULT_CALL_TIMEOUT_SECS))
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    pub provider: Option<String>,
    pub fallback_provider: Option<String>,
    pub openai: Option<OpenAiConfig>,
    pub huggingface: Option<HuggingFaceConfig>,
}

impl LlmConfig {
    /// Primary provider name, `None` when external generation is disabled
    #[must_use]
    pub fn primary_provider(&self) -> Option<&str> {
        match self.provider.as_deref() {
            Some("none") => None,
            Some(name) => Some(name),
            None => Some(DEFAULT_PROVIDER),
        }
    }

    /// Secondary provider name, `None` when not configured
    #[must_use]
    pub fn secondary_provider(&self) -> Option<&str> {
        match self.fallback_provider.as_deref() {
            Some("none") | None => None,
            Some(name) => Some(name),
        }
    }
}

/// OpenAI chat-completions provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// HuggingFace inference provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HuggingFaceConfig {
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_new_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Config {
    /// Built-in defaults: OpenAI primary, HuggingFace secondary.
    #[must_use]
    pub fn defaults() -> Self {
        let mut source_attribution = HashMap::new();
        for key in [
            "max_rate_limit_attempts",
            "base_delay_ms",
            "call_timeout_secs",
            "llm.provider",
            "llm.fallback_provider",
        ] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        Self {
            generation: GenerationConfig {
                max_rate_limit_attempts: Some(DEFAULT_MAX_RATE_LIMIT_ATTEMPTS),
                base_delay_ms: Some(DEFAULT_BASE_DELAY_MS),
                call_timeout_secs: Some(DEFAULT_CALL_TIMEOUT_SECS),
            },
            llm: LlmConfig {
                provider: Some(DEFAULT_PROVIDER.to_string()),
                fallback_provider: Some(DEFAULT_FALLBACK_PROVIDER.to_string()),
                openai: None,
                huggingface: None,
            },
            source_attribution,
        }
    }

    /// Deterministic-only configuration for tests: no external providers and
    /// millisecond backoff.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        let mut config = Self::defaults();
        config.llm.provider = Some("none".to_string());
        config.llm.fallback_provider = None;
        config.generation.base_delay_ms = Some(1);
        config.generation.call_timeout_secs = Some(5);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::defaults();
        assert_eq!(config.generation.max_rate_limit_attempts(), 3);
        assert_eq!(config.generation.base_delay(), Duration::from_secs(1));
        assert_eq!(config.generation.call_timeout(), Duration::from_secs(60));
        assert_eq!(config.llm.primary_provider(), Some("openai"));
        assert_eq!(config.llm.secondary_provider(), Some("huggingface"));
    }

    #[test]
    fn test_none_provider_disables_generation() {
        let mut config = Config::defaults();
        config.llm.provider = Some("none".to_string());
        config.llm.fallback_provider = Some("none".to_string());
        assert_eq!(config.llm.primary_provider(), None);
        assert_eq!(config.llm.secondary_provider(), None);
    }

    #[test]
    fn test_empty_generation_section_uses_defaults() {
        let generation = GenerationConfig::default();
        assert_eq!(
            generation.max_rate_limit_attempts(),
            DEFAULT_MAX_RATE_LIMIT_ATTEMPTS
        );
        assert_eq!(
            generation.base_delay(),
            Duration::from_millis(DEFAULT_BASE_DELAY_MS)
        );
    }
}
