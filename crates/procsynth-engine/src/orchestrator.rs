//! Generation orchestrator
//!
//! Sequences the primary generator, the secondary generator, and the local
//! deterministic pipeline as an explicit state machine:
//!
//! ```text
//! TryPrimary{1} --429--> TryPrimary{2} --429--> TryPrimary{n} --429--> TrySecondary | Fallback
//!      |  other error ---------------------------------------------------> Fallback
//!      +--ok--> Done                       TrySecondary --err--> Fallback --> Done
//! ```
//!
//! `Done` validates the document; a validation failure ends in `Failed` and is
//! returned to the caller. Rate limits are the only retried condition.

use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{Instrument, debug, error, info, warn};

use procsynth_config::Config;
use procsynth_llm::{
    CompletionRequest, GeneratorBackend, GeneratorError, GeneratorSet, generators_from_config,
};
use procsynth_prompt_template::PromptTemplate;
use procsynth_utils::error::SynthError;
use procsynth_utils::logging::request_span;
use procsynth_validation::validate_strict;

use crate::guided::guided_description;
use crate::history::{OptimizationHistory, OptimizationRecord, ProcessDocument};
use crate::pipeline::DeterministicPipeline;
use crate::report::{GenerationReport, GenerationSource, State};
use crate::request::{GenerationRequest, GuidedRequest, OptimizeRequest};
use crate::response::{OptimizationResponse, extract_xml_block, parse_optimization_response};

/// Token limit for generation prompts
pub const GENERATION_MAX_TOKENS: u32 = 4000;
/// Token limit for optimization prompts
pub const OPTIMIZATION_MAX_TOKENS: u32 = 2000;

/// Retry, backoff and timeout settings, read once from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total primary attempts while rate limited
    pub max_rate_limit_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound on each external call
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&Config::defaults())
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_rate_limit_attempts: config.generation.max_rate_limit_attempts().max(1),
            base_delay: config.generation.base_delay(),
            call_timeout: config.generation.call_timeout(),
        }
    }

    /// Sleep after the `attempt`-th rate-limited call: `base * 2^(attempt-1)`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

/// A generated document and how it was produced
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub document: ProcessDocument,
    pub report: GenerationReport,
}

/// The record appended by an optimization and how it was produced
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub record: OptimizationRecord,
    pub summary: String,
    pub report: GenerationReport,
}

/// Drives requests through the generator chain.
///
/// Holds no per-request state; one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    generators: GeneratorSet,
    policy: RetryPolicy,
    pipeline: DeterministicPipeline,
}

impl Orchestrator {
    #[must_use]
    pub fn new(generators: GeneratorSet, policy: RetryPolicy) -> Self {
        Self {
            generators,
            policy,
            pipeline: DeterministicPipeline::default(),
        }
    }

    /// Build generators and policy from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(generators_from_config(config), RetryPolicy::from_config(config))
    }

    #[must_use]
    pub fn with_pipeline(mut self, pipeline: DeterministicPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    #[must_use]
    pub fn generators(&self) -> &GeneratorSet {
        &self.generators
    }

    /// Generate a document from a free-text description.
    ///
    /// # Errors
    ///
    /// `SynthError::Input` for invalid requests (no generator is called) and
    /// `SynthError::Validation` when a generator's document fails validation.
    /// Generator failures never surface here; they end in the fallback.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, SynthError> {
        request.validate()?;
        let span = request_span("generate", request.industry.as_str());
        self.generate_document(&request.description, &request.title, request.industry.as_str())
            .instrument(span)
            .await
    }

    /// Generate a document from questionnaire answers.
    ///
    /// # Errors
    ///
    /// As [`generate`](Self::generate).
    pub async fn generate_guided(
        &self,
        request: &GuidedRequest,
    ) -> Result<GenerationOutcome, SynthError> {
        request.validate()?;
        let span = request_span("guided", request.industry.as_str());
        let description = guided_description(&request.answers);
        self.generate_document(&description, &request.title, request.industry.as_str())
            .instrument(span)
            .await
    }

    /// Optimize an existing document and append the result to `history`.
    ///
    /// When no generator produces a usable answer the existing document is
    /// kept and generic improvements are recorded. `history` is only touched
    /// once the new document has been validated.
    ///
    /// # Errors
    ///
    /// `SynthError::Input` for invalid requests and `SynthError::Validation`
    /// when the resulting document fails validation.
    pub async fn optimize(
        &self,
        request: &OptimizeRequest,
        history: &mut OptimizationHistory,
    ) -> Result<OptimizationOutcome, SynthError> {
        request.validate()?;
        let span = request_span("optimize", request.industry.as_str());

        async {
            let context = serde_json::to_string(&request.goals)
                .unwrap_or_else(|_| "{}".to_string());
            let completion =
                CompletionRequest::new(PromptTemplate::Optimization, self.policy.call_timeout)
                    .with_variable("currentBpmn", request.document.as_str())
                    .with_variable("industry", request.industry.as_str())
                    .with_variable("context", context)
                    .with_max_tokens(OPTIMIZATION_MAX_TOKENS);

            let mut report = GenerationReport::default();
            let response = match self
                .run_external(&completion, parse_optimization_response, &mut report)
                .await
            {
                Some((response, source)) => {
                    report.source = source;
                    response
                }
                None => {
                    report.source = GenerationSource::Fallback;
                    warn!("No generator optimized the document; recording a no-op optimization");
                    OptimizationResponse::no_op(&request.document)
                }
            };

            let document = self.finish(&response.bpmn_xml, &mut report)?;
            let record = history.append(response.changes, document).clone();
            info!(
                version = record.version,
                source = ?report.source,
                "Optimization recorded"
            );
            Ok::<_, SynthError>(OptimizationOutcome {
                record,
                summary: response.summary,
                report,
            })
        }
        .instrument(span)
        .await
    }

    async fn generate_document(
        &self,
        description: &str,
        title: &str,
        industry: &str,
    ) -> Result<GenerationOutcome, SynthError> {
        let completion = CompletionRequest::new(PromptTemplate::Generation, self.policy.call_timeout)
            .with_variable("description", description)
            .with_variable("industry", industry)
            .with_max_tokens(GENERATION_MAX_TOKENS);

        let mut report = GenerationReport::default();
        let xml = match self
            .run_external(
                &completion,
                |text| extract_xml_block(text).map(str::to_string),
                &mut report,
            )
            .await
        {
            Some((xml, source)) => {
                report.source = source;
                xml
            }
            None => {
                report.source = GenerationSource::Fallback;
                info!(state = %State::Fallback, "Running deterministic pipeline");
                self.pipeline.synthesize(description, title)
            }
        };

        let document = self.finish(&xml, &mut report)?;
        info!(
            source = ?report.source,
            attempts = report.attempts,
            complexity = %document.complexity(),
            "Document generated"
        );
        Ok(GenerationOutcome { document, report })
    }

    /// Walk the external part of the state machine.
    ///
    /// Returns the parsed value and its source, or `None` once the machine
    /// reaches `Fallback`.
    async fn run_external<T, P>(
        &self,
        request: &CompletionRequest,
        parse: P,
        report: &mut GenerationReport,
    ) -> Option<(T, GenerationSource)>
    where
        P: Fn(&str) -> Option<T>,
    {
        let mut state = match (&self.generators.primary, &self.generators.secondary) {
            (Some(_), _) => State::TryPrimary { attempt: 1 },
            (None, Some(_)) => State::TrySecondary,
            (None, None) => State::Fallback,
        };

        loop {
            report.enter(state);
            match state {
                State::TryPrimary { attempt } => {
                    let Some(backend) = self.generators.primary.as_deref() else {
                        state = self.after_primary();
                        continue;
                    };
                    match self.attempt(backend, request, &parse, report).await {
                        Ok(value) => return Some((value, GenerationSource::Primary)),
                        Err(e) if e.is_retryable() => {
                            if attempt < self.policy.max_rate_limit_attempts {
                                let delay = self.policy.backoff_delay(attempt);
                                info!(
                                    state = %state,
                                    attempt,
                                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                                    provider = backend.name(),
                                    "Rate limited; backing off"
                                );
                                report.backoff_delays.push(delay);
                                tokio::time::sleep(delay).await;
                                state = State::TryPrimary {
                                    attempt: attempt + 1,
                                };
                            } else {
                                state = self.after_primary();
                                info!(
                                    attempts = attempt,
                                    next = %state,
                                    "Rate limit retries exhausted"
                                );
                            }
                        }
                        Err(_) => state = State::Fallback,
                    }
                }
                State::TrySecondary => {
                    let Some(backend) = self.generators.secondary.as_deref() else {
                        state = State::Fallback;
                        continue;
                    };
                    match self.attempt(backend, request, &parse, report).await {
                        Ok(value) => return Some((value, GenerationSource::Secondary)),
                        Err(_) => state = State::Fallback,
                    }
                }
                State::Fallback | State::Done | State::Failed => return None,
            }
        }
    }

    fn after_primary(&self) -> State {
        if self.generators.secondary.is_some() {
            State::TrySecondary
        } else {
            State::Fallback
        }
    }

    /// One bounded call plus response parsing. An unusable response counts
    /// as a transient failure.
    async fn attempt<T, P>(
        &self,
        backend: &dyn GeneratorBackend,
        request: &CompletionRequest,
        parse: &P,
        report: &mut GenerationReport,
    ) -> Result<T, GeneratorError>
    where
        P: Fn(&str) -> Option<T>,
    {
        report.attempts += 1;
        let limit = self.policy.call_timeout;
        debug!(provider = backend.name(), template = request.template.as_str(), "Calling generator");

        let result = match tokio::time::timeout(limit, backend.complete(request.clone())).await {
            Ok(Ok(completion)) => parse(&completion.text).ok_or_else(|| {
                GeneratorError::Transient(format!(
                    "{} returned no usable document",
                    backend.name()
                ))
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(GeneratorError::Timeout { duration: limit }),
        };

        if let Err(e) = &result {
            report.record_failure(backend.name(), e);
            match e {
                GeneratorError::QuotaExceeded(_) => warn!(
                    provider = backend.name(),
                    error = %e,
                    "Generator quota exceeded; operator attention required"
                ),
                GeneratorError::RateLimited { retry_after_secs } => debug!(
                    provider = backend.name(),
                    retry_after_secs,
                    "Generator rate limited"
                ),
                _ => warn!(
                    provider = backend.name(),
                    kind = e.kind(),
                    error = %e,
                    "Generator call failed"
                ),
            }
        }
        result
    }

    /// `Done`: validate and derive metadata, or end in `Failed`.
    fn finish(
        &self,
        xml: &str,
        report: &mut GenerationReport,
    ) -> Result<ProcessDocument, SynthError> {
        match validate_strict(xml) {
            Ok(cleaned) => {
                report.enter(State::Done);
                Ok(ProcessDocument::from_validated(cleaned))
            }
            Err(e) => {
                report.enter(State::Failed);
                error!(source = ?report.source, error = %e, "Produced document failed validation");
                Err(e.into())
            }
        }
    }
}

/// Flatten `key=value` goal pairs into the map an [`OptimizeRequest`] takes.
#[must_use]
pub fn goals_from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}
