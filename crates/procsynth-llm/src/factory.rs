//! Generator construction from configuration

use std::sync::Arc;
use tracing::{info, warn};

use crate::huggingface_backend::HuggingFaceBackend;
use crate::openai_backend::OpenAiBackend;
use crate::types::GeneratorBackend;
use procsynth_config::Config;
use procsynth_utils::error::GeneratorError;

/// The primary and secondary generators available to the orchestrator.
///
/// Either slot may be empty; with both empty only the deterministic pipeline
/// runs.
#[derive(Clone, Default)]
pub struct GeneratorSet {
    pub primary: Option<Arc<dyn GeneratorBackend>>,
    pub secondary: Option<Arc<dyn GeneratorBackend>>,
}

impl std::fmt::Debug for GeneratorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorSet")
            .field("primary", &self.primary.as_ref().map(|b| b.name().to_string()))
            .field(
                "secondary",
                &self.secondary.as_ref().map(|b| b.name().to_string()),
            )
            .finish()
    }
}

impl GeneratorSet {
    /// No external generators
    #[must_use]
    pub fn deterministic_only() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_primary(mut self, backend: Arc<dyn GeneratorBackend>) -> Self {
        self.primary = Some(backend);
        self
    }

    #[must_use]
    pub fn with_secondary(mut self, backend: Arc<dyn GeneratorBackend>) -> Self {
        self.secondary = Some(backend);
        self
    }

    #[must_use]
    pub fn is_deterministic_only(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }
}

/// Construct a backend for a specific provider.
///
/// # Errors
///
/// Returns `GeneratorError::Misconfiguration` if the provider is unknown or its
/// credentials are missing.
pub fn construct_backend_for_provider(
    provider: &str,
    config: &Config,
) -> Result<Arc<dyn GeneratorBackend>, GeneratorError> {
    match provider {
        "openai" => Ok(Arc::new(OpenAiBackend::new_from_config(config)?)),
        "huggingface" => Ok(Arc::new(HuggingFaceBackend::new_from_config(config)?)),
        unknown => Err(GeneratorError::Misconfiguration(format!(
            "Unknown generator provider '{unknown}'. Supported providers: openai, huggingface."
        ))),
    }
}

/// Build the generator set described by `[llm]`.
///
/// A provider that cannot be constructed (typically a missing API key) is
/// reported and left out rather than failing start-up.
#[must_use]
pub fn generators_from_config(config: &Config) -> GeneratorSet {
    let build = |slot: &str, provider: Option<&str>| {
        let provider = provider?;
        match construct_backend_for_provider(provider, config) {
            Ok(backend) => {
                info!(slot, provider, "Generator configured");
                Some(backend)
            }
            Err(e) => {
                warn!(slot, provider, error = %e, "Generator unavailable");
                None
            }
        }
    };

    let set = GeneratorSet {
        primary: build("primary", config.llm.primary_provider()),
        secondary: build("secondary", config.llm.secondary_provider()),
    };

    if set.is_deterministic_only() {
        warn!("No external generators configured; using the deterministic pipeline only");
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use procsynth_config::OpenAiConfig;
    use serial_test::serial;

    #[test]
    fn test_none_provider_builds_empty_set() {
        let config = Config::minimal_for_testing();
        let set = generators_from_config(&config);
        assert!(set.is_deterministic_only());
    }

    #[test]
    fn test_unknown_provider_is_misconfiguration() {
        let config = Config::minimal_for_testing();
        assert!(matches!(
            construct_backend_for_provider("gemini", &config),
            Err(GeneratorError::Misconfiguration(_))
        ));
    }

    #[test]
    #[serial]
    fn test_missing_key_leaves_slot_empty() {
        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("openai".to_string());
        config.llm.openai = Some(OpenAiConfig {
            api_key_env: Some("PROCSYNTH_TEST_FACTORY_MISSING".to_string()),
            ..OpenAiConfig::default()
        });
        unsafe {
            std::env::remove_var("PROCSYNTH_TEST_FACTORY_MISSING");
        }

        let set = generators_from_config(&config);
        assert!(set.primary.is_none());
        assert!(set.secondary.is_none());
    }

    #[test]
    #[serial]
    fn test_configured_key_fills_primary() {
        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("openai".to_string());
        config.llm.openai = Some(OpenAiConfig {
            api_key_env: Some("PROCSYNTH_TEST_FACTORY_PRESENT".to_string()),
            ..OpenAiConfig::default()
        });
        unsafe {
            std::env::set_var("PROCSYNTH_TEST_FACTORY_PRESENT", "sk-test");
        }
        let set = generators_from_config(&config);
        unsafe {
            std::env::remove_var("PROCSYNTH_TEST_FACTORY_PRESENT");
        }

        assert_eq!(set.primary.as_ref().map(|b| b.name()), Some("openai"));
        assert!(set.secondary.is_none());
    }
}
