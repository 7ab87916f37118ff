//! OpenAI chat-completions backend

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_client::HttpClient;
use crate::types::{Completion, CompletionRequest, GeneratorBackend, Message};
use procsynth_config::Config;
use procsynth_utils::error::GeneratorError;

/// Default OpenAI API endpoint
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// HTTP request parameters
#[derive(Debug, Clone)]
pub(crate) struct HttpParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for HttpParams {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            temperature: 0.3,
        }
    }
}

#[derive(Clone)]
pub(crate) struct OpenAiBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    params: HttpParams,
}

impl OpenAiBackend {
    /// # Errors
    ///
    /// Returns `GeneratorError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        params: HttpParams,
    ) -> Result<Self, GeneratorError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model,
            params,
        })
    }

    /// Create the backend from `[llm.openai]`.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Misconfiguration` if the API key environment
    /// variable is not set or the HTTP client cannot be constructed.
    pub fn new_from_config(config: &Config) -> Result<Self, GeneratorError> {
        let section = config.llm.openai.clone().unwrap_or_default();

        let api_key_env = section
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV);
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GeneratorError::Misconfiguration(format!(
                    "OpenAI API key not found in environment variable '{api_key_env}'. \
                     Set this variable or configure a different api_key_env in [llm.openai]."
                ))
            })?;

        let defaults = HttpParams::default();
        let params = HttpParams {
            max_tokens: section.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: section.temperature.unwrap_or(defaults.temperature),
        };

        Self::new(
            api_key,
            section.base_url,
            section.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            params,
        )
    }

    fn build_request_body(&self, messages: Vec<Message>, max_tokens: u32) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens,
            temperature: self.params.temperature,
        }
    }
}

#[async_trait]
impl GeneratorBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GeneratorError> {
        let max_tokens = request.max_tokens.unwrap_or(self.params.max_tokens);
        let body = self.build_request_body(request.messages()?, max_tokens);

        debug!(
            provider = "openai",
            model = %self.model,
            template = request.template.as_str(),
            max_tokens,
            "Invoking OpenAI backend"
        );

        let http_request = self
            .client
            .inner()
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body);

        let response = self
            .client
            .execute(http_request, request.timeout, "openai")
            .await?;

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            GeneratorError::Transient(format!("Failed to parse OpenAI response: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GeneratorError::Transient("OpenAI response missing choices[0] content".to_string())
            })?;

        Ok(Completion::new(content, "openai", self.model.clone()))
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
