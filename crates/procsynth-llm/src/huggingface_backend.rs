//! HuggingFace inference API backend
//!
//! Text-generation models take a single `inputs` string, so the system and
//! user messages are joined with a blank line.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_client::HttpClient;
use crate::types::{Completion, CompletionRequest, GeneratorBackend, Message};
use procsynth_config::Config;
use procsynth_utils::error::GeneratorError;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_API_KEY_ENV: &str = "HUGGINGFACE_API_KEY";
const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const DEFAULT_MAX_NEW_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.3;

#[derive(Clone)]
pub(crate) struct HuggingFaceBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    max_new_tokens: u32,
    temperature: f32,
}

impl HuggingFaceBackend {
    /// Create the backend from `[llm.huggingface]`.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Misconfiguration` if the API key environment
    /// variable is not set or the HTTP client cannot be constructed.
    pub fn new_from_config(config: &Config) -> Result<Self, GeneratorError> {
        let section = config.llm.huggingface.clone().unwrap_or_default();

        let api_key_env = section
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV);
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GeneratorError::Misconfiguration(format!(
                    "HuggingFace API key not found in environment variable '{api_key_env}'. \
                     Set this variable or configure a different api_key_env in [llm.huggingface]."
                ))
            })?;

        Ok(Self {
            client: HttpClient::new()?,
            base_url: section
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: section.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_new_tokens: section.max_new_tokens.unwrap_or(DEFAULT_MAX_NEW_TOKENS),
            temperature: section.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.model)
    }

    fn build_request_body(&self, messages: &[Message], max_new_tokens: u32) -> InferenceRequest {
        let inputs = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        InferenceRequest {
            inputs,
            parameters: InferenceParameters {
                max_new_tokens,
                temperature: self.temperature,
                return_full_text: false,
            },
        }
    }
}

/// Pull `generated_text` out of the inference API's `[{..}]` response
fn parse_generated_text(value: serde_json::Value) -> Result<String, GeneratorError> {
    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Err(GeneratorError::Transient(format!(
            "HuggingFace returned error: {message}"
        )));
    }

    let outputs: Vec<GeneratedText> = serde_json::from_value(value).map_err(|e| {
        GeneratorError::Transient(format!("Failed to parse HuggingFace response: {e}"))
    })?;

    outputs
        .into_iter()
        .next()
        .map(|o| o.generated_text)
        .ok_or_else(|| GeneratorError::Transient("HuggingFace response was empty".to_string()))
}

#[async_trait]
impl GeneratorBackend for HuggingFaceBackend {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GeneratorError> {
        let max_new_tokens = request.max_tokens.unwrap_or(self.max_new_tokens);
        let body = self.build_request_body(&request.messages()?, max_new_tokens);

        debug!(
            provider = "huggingface",
            model = %self.model,
            template = request.template.as_str(),
            max_new_tokens,
            "Invoking HuggingFace backend"
        );

        let http_request = self
            .client
            .inner()
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body);

        let response = self
            .client
            .execute(http_request, request.timeout, "huggingface")
            .await?;

        let value: serde_json::Value = response.json().await.map_err(|e| {
            GeneratorError::Transient(format!("Failed to parse HuggingFace response: {e}"))
        })?;

        let text = parse_generated_text(value)?;
        Ok(Completion::new(text, "huggingface", self.model.clone()))
    }
}

#[derive(Debug, Clone, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Debug, Clone, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use procsynth_config::HuggingFaceConfig;
    use serde_json::json;
    use serial_test::serial;

    fn backend() -> HuggingFaceBackend {
        HuggingFaceBackend {
            client: HttpClient::new().unwrap(),
            base_url: "https://hf.example/models/".to_string(),
            api_key: "hf-test".to_string(),
            model: "org/model".to_string(),
            max_new_tokens: 100,
            temperature: 0.3,
        }
    }

    #[test]
    fn test_endpoint_joins_model() {
        assert_eq!(backend().endpoint(), "https://hf.example/models/org/model");
    }

    #[test]
    fn test_request_body_joins_messages() {
        let messages = vec![Message::system("sys"), Message::user("describe")];
        let body = backend().build_request_body(&messages, 64);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["inputs"], "sys\n\ndescribe");
        assert_eq!(json["parameters"]["max_new_tokens"], 64);
        assert_eq!(json["parameters"]["return_full_text"], false);
    }

    #[test]
    fn test_parse_generated_text() {
        let value = json!([{ "generated_text": "<bpmn:definitions/>" }]);
        assert_eq!(parse_generated_text(value).unwrap(), "<bpmn:definitions/>");
    }

    #[test]
    fn test_parse_error_object_is_transient() {
        let value = json!({ "error": "Model org/model is currently loading" });
        match parse_generated_text(value) {
            Err(GeneratorError::Transient(msg)) => assert!(msg.contains("currently loading")),
            other => panic!("Expected Transient, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_array_is_transient() {
        assert!(matches!(
            parse_generated_text(json!([])),
            Err(GeneratorError::Transient(_))
        ));
    }

    #[test]
    #[serial]
    fn test_new_from_config_requires_api_key() {
        let mut config = Config::minimal_for_testing();
        config.llm.huggingface = Some(HuggingFaceConfig {
            api_key_env: Some("PROCSYNTH_TEST_UNSET_HF_KEY".to_string()),
            ..HuggingFaceConfig::default()
        });
        unsafe {
            std::env::remove_var("PROCSYNTH_TEST_UNSET_HF_KEY");
        }
        assert!(matches!(
            HuggingFaceBackend::new_from_config(&config),
            Err(GeneratorError::Misconfiguration(_))
        ));
    }
}
