//! Core types for the external generator abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use procsynth_prompt_template::{PromptTemplate, TemplateError};
use procsynth_utils::error::GeneratorError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Input to a generator call: a template plus the values for its variables
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub template: PromptTemplate,
    pub variables: BTreeMap<String, String>,
    /// Upper bound for this call; backends pass it to the HTTP layer
    pub timeout: Duration,
    /// Overrides the backend's configured token limit
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(template: PromptTemplate, timeout: Duration) -> Self {
        Self {
            template,
            variables: BTreeMap::new(),
            timeout,
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Render into `[system, user]` chat messages.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Misconfiguration` when a template variable is
    /// missing, since retrying cannot fix it.
    pub fn messages(&self) -> Result<Vec<Message>, GeneratorError> {
        let prompt = self
            .template
            .render(&self.variables)
            .map_err(|e: TemplateError| GeneratorError::Misconfiguration(e.to_string()))?;
        Ok(vec![
            Message::system(self.template.system_prompt()),
            Message::user(prompt),
        ])
    }
}

/// Text returned by a generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    pub provider: String,
    pub model: String,
}

impl Completion {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// Trait for external generator implementations
///
/// The orchestrator only sees this trait, so scripted backends can stand in for
/// HTTP providers in tests.
#[async_trait]
pub trait GeneratorBackend: Send + Sync {
    /// Provider name used in logs and generation reports
    fn name(&self) -> &str;

    /// Run a single completion.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError` classified by the failure taxonomy: rate
    /// limits, quota exhaustion, transient failures, timeouts, and
    /// misconfiguration.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pair_system_and_user() {
        let request = CompletionRequest::new(PromptTemplate::Generation, Duration::from_secs(5))
            .with_variable("description", "Approve the invoice")
            .with_variable("industry", "finance");
        let messages = request.messages().unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            messages[0].content,
            PromptTemplate::Generation.system_prompt()
        );
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("Approve the invoice"));
    }

    #[test]
    fn test_missing_variable_is_misconfiguration() {
        let request = CompletionRequest::new(PromptTemplate::Generation, Duration::from_secs(5))
            .with_variable("description", "Approve the invoice");
        assert!(matches!(
            request.messages(),
            Err(GeneratorError::Misconfiguration(_))
        ));
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
