//! Scripted generator for tests.
//!
//! Test seam; not part of public API stability guarantees.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::types::{Completion, CompletionRequest, GeneratorBackend};
use procsynth_prompt_template::PromptTemplate;
use procsynth_utils::error::GeneratorError;

/// A backend that replays a fixed script of outcomes, one per call.
///
/// Once the script is exhausted every call fails with a transient error.
pub struct ScriptedBackend {
    name: String,
    script: Mutex<VecDeque<Result<String, GeneratorError>>>,
    calls: AtomicUsize,
    templates: Mutex<Vec<PromptTemplate>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new(name: impl Into<String>, script: Vec<Result<String, GeneratorError>>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            templates: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Always answer with `text`
    #[must_use]
    pub fn always(name: impl Into<String>, text: impl Into<String>, times: usize) -> Self {
        let text = text.into();
        Self::new(name, (0..times).map(|_| Ok(text.clone())).collect())
    }

    /// Sleep before answering, to exercise call timeouts
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `complete` calls received
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Templates of the requests received, in call order
    #[must_use]
    pub fn templates(&self) -> Vec<PromptTemplate> {
        self.templates
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GeneratorBackend for ScriptedBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut templates) = self.templates.lock() {
            templates.push(request.template);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        match next {
            Some(Ok(text)) => Ok(Completion::new(text, self.name.clone(), "scripted")),
            Some(Err(e)) => Err(e),
            None => Err(GeneratorError::Transient(format!(
                "{} script exhausted",
                self.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest::new(PromptTemplate::Generation, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_replays_script_in_order() {
        let backend = ScriptedBackend::new(
            "primary",
            vec![
                Err(GeneratorError::RateLimited {
                    retry_after_secs: None,
                }),
                Ok("<xml/>".to_string()),
            ],
        );

        assert!(matches!(
            backend.complete(request()).await,
            Err(GeneratorError::RateLimited { .. })
        ));
        assert_eq!(backend.complete(request()).await.unwrap().text, "<xml/>");
        assert!(matches!(
            backend.complete(request()).await,
            Err(GeneratorError::Transient(_))
        ));
        assert_eq!(backend.calls(), 3);
        assert_eq!(backend.templates().len(), 3);
    }
}
