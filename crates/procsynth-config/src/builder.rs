use std::time::Duration;

use procsynth_utils::error::ConfigError;

use super::{Config, ConfigSource};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding the engine without relying on environment
    /// variables or config files.
    ///
    /// # Example
    ///
    /// ```rust
    /// use procsynth_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .provider("none")
    ///     .base_delay(Duration::from_millis(10))
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.llm.primary_provider(), None);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration.
///
/// All values set via the builder are attributed to
/// `ConfigSource::Programmatic` in the resulting `Config`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    max_rate_limit_attempts: Option<u32>,
    base_delay: Option<Duration>,
    call_timeout: Option<Duration>,
    provider: Option<String>,
    fallback_provider: Option<String>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_rate_limit_attempts(mut self, attempts: u32) -> Self {
        self.max_rate_limit_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn fallback_provider(mut self, provider: impl Into<String>) -> Self {
        self.fallback_provider = Some(provider.into());
        self
    }

    /// Build the configuration, validating the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a value is out of range.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = Config::defaults();
        let source = ConfigSource::Programmatic;

        if let Some(attempts) = self.max_rate_limit_attempts {
            config.generation.max_rate_limit_attempts = Some(attempts);
            config.attribute("max_rate_limit_attempts", source);
        }
        if let Some(delay) = self.base_delay {
            config.generation.base_delay_ms =
                Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
            config.attribute("base_delay_ms", source);
        }
        if let Some(timeout) = self.call_timeout {
            config.generation.call_timeout_secs = Some(timeout.as_secs());
            config.attribute("call_timeout_secs", source);
        }
        if let Some(provider) = self.provider {
            config.llm.provider = Some(provider);
            config.attribute("llm.provider", source);
        }
        if let Some(fallback) = self.fallback_provider {
            config.llm.fallback_provider = Some(fallback);
            config.attribute("llm.fallback_provider", source);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_attributes_programmatic_source() {
        let config = Config::builder()
            .max_rate_limit_attempts(5)
            .fallback_provider("none")
            .build()
            .unwrap();

        assert_eq!(config.generation.max_rate_limit_attempts(), 5);
        assert_eq!(config.llm.secondary_provider(), None);
        assert_eq!(
            config.source_attribution.get("max_rate_limit_attempts"),
            Some(&ConfigSource::Programmatic)
        );
        assert_eq!(
            config.source_attribution.get("call_timeout_secs"),
            Some(&ConfigSource::Default)
        );
    }

    #[test]
    fn test_builder_validates() {
        let result = Config::builder().call_timeout(Duration::from_millis(10)).build();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_builder_delay_in_millis() {
        let config = Config::builder()
            .base_delay(Duration::from_millis(25))
            .build()
            .unwrap();
        assert_eq!(config.generation.base_delay(), Duration::from_millis(25));
    }
}
