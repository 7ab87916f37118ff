use std::collections::BTreeMap;

use super::{Config, ConfigSource};

fn source_label(source: Option<&ConfigSource>) -> String {
    source.copied().unwrap_or(ConfigSource::Default).to_string()
}

impl Config {
    /// Effective configuration as `key -> (value, source)`, sorted by key
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, attribution_key: &str, value: Option<String>| {
            if let Some(val) = value {
                let source = source_label(self.source_attribution.get(attribution_key));
                config.insert(key.to_string(), (val, source));
            }
        };

        add_config(
            "max_rate_limit_attempts",
            "max_rate_limit_attempts",
            Some(self.generation.max_rate_limit_attempts().to_string()),
        );
        add_config(
            "base_delay_ms",
            "base_delay_ms",
            Some(self.generation.base_delay().as_millis().to_string()),
        );
        add_config(
            "call_timeout_secs",
            "call_timeout_secs",
            Some(self.generation.call_timeout().as_secs().to_string()),
        );
        add_config(
            "llm.provider",
            "llm.provider",
            Some(self.llm.primary_provider().unwrap_or("none").to_string()),
        );
        add_config(
            "llm.fallback_provider",
            "llm.fallback_provider",
            Some(self.llm.secondary_provider().unwrap_or("none").to_string()),
        );

        let model_source = if self.source_attribution.contains_key("model") {
            "model"
        } else {
            "llm.openai"
        };
        add_config(
            "llm.openai.model",
            model_source,
            self.llm.openai.as_ref().and_then(|o| o.model.clone()),
        );
        let model_source = if self.source_attribution.contains_key("model") {
            "model"
        } else {
            "llm.huggingface"
        };
        add_config(
            "llm.huggingface.model",
            model_source,
            self.llm.huggingface.as_ref().and_then(|h| h.model.clone()),
        );

        config
    }
}
