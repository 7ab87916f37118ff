use procsynth_utils::error::ConfigError;

use super::{Config, SUPPORTED_PROVIDERS};

const MAX_RATE_LIMIT_ATTEMPTS: u32 = 10;
const MAX_BASE_DELAY_MS: u64 = 60_000;

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(attempts) = self.generation.max_rate_limit_attempts
            && !(1..=MAX_RATE_LIMIT_ATTEMPTS).contains(&attempts)
        {
            return Err(invalid(
                "max_rate_limit_attempts",
                format!("{attempts} (must be between 1 and {MAX_RATE_LIMIT_ATTEMPTS})"),
            ));
        }

        if let Some(delay) = self.generation.base_delay_ms
            && delay > MAX_BASE_DELAY_MS
        {
            return Err(invalid(
                "base_delay_ms",
                format!("{delay} (exceeds maximum of {MAX_BASE_DELAY_MS})"),
            ));
        }

        if self.generation.call_timeout_secs == Some(0) {
            return Err(invalid("call_timeout_secs", "must be greater than 0"));
        }

        for (key, provider) in [
            ("llm.provider", self.llm.provider.as_deref()),
            ("llm.fallback_provider", self.llm.fallback_provider.as_deref()),
        ] {
            if let Some(name) = provider
                && !SUPPORTED_PROVIDERS.contains(&name)
            {
                return Err(invalid(
                    key,
                    format!(
                        "unknown provider '{name}' (supported: {})",
                        SUPPORTED_PROVIDERS.join(", ")
                    ),
                ));
            }
        }

        if let (Some(primary), Some(secondary)) =
            (self.llm.primary_provider(), self.llm.secondary_provider())
            && primary == secondary
        {
            return Err(invalid(
                "llm.fallback_provider",
                format!("'{secondary}' is already the primary provider"),
            ));
        }

        let temperatures = [
            (
                "llm.openai.temperature",
                self.llm.openai.as_ref().and_then(|o| o.temperature),
            ),
            (
                "llm.huggingface.temperature",
                self.llm.huggingface.as_ref().and_then(|h| h.temperature),
            ),
        ];
        for (key, temperature) in temperatures {
            if let Some(t) = temperature
                && !(0.0..=2.0).contains(&t)
            {
                return Err(invalid(key, format!("{t} (must be between 0.0 and 2.0)")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpenAiConfig;

    fn expect_invalid_key(config: &Config, expected: &str) {
        match config.validate() {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, expected),
            other => panic!("Expected InvalidValue for {expected}, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::defaults().validate().is_ok());
    }

    #[test]
    fn test_attempts_bounds() {
        let mut config = Config::defaults();
        config.generation.max_rate_limit_attempts = Some(0);
        expect_invalid_key(&config, "max_rate_limit_attempts");

        config.generation.max_rate_limit_attempts = Some(11);
        expect_invalid_key(&config, "max_rate_limit_attempts");

        config.generation.max_rate_limit_attempts = Some(10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::defaults();
        config.generation.call_timeout_secs = Some(0);
        expect_invalid_key(&config, "call_timeout_secs");
    }

    #[test]
    fn test_excessive_base_delay_rejected() {
        let mut config = Config::defaults();
        config.generation.base_delay_ms = Some(120_000);
        expect_invalid_key(&config, "base_delay_ms");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let mut config = Config::defaults();
        config.llm.provider = Some("anthropic-direct".to_string());
        expect_invalid_key(&config, "llm.provider");
    }

    #[test]
    fn test_fallback_must_differ_from_primary() {
        let mut config = Config::defaults();
        config.llm.fallback_provider = Some("openai".to_string());
        expect_invalid_key(&config, "llm.fallback_provider");
    }

    #[test]
    fn test_temperature_range() {
        let mut config = Config::defaults();
        config.llm.openai = Some(OpenAiConfig {
            temperature: Some(2.5),
            ..OpenAiConfig::default()
        });
        expect_invalid_key(&config, "llm.openai.temperature");
    }
}
