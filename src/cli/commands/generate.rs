//! Generate and guided command implementations
//!
//! Handles `procsynth generate` and `procsynth guided`.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::Path;

use super::common::{finish_report, parse_industry, read_text, write_output};
use crate::{
    Config, ExitCode, GenerationOutcome, GenerationRequest, GuidedRequest, Industry, Orchestrator,
};

/// Execute the generate command
pub async fn execute_generate_command(
    title: &str,
    industry: &str,
    description: Option<&str>,
    file: Option<&Path>,
    json: bool,
    output: Option<&Path>,
    config: &Config,
) -> Result<ExitCode> {
    let industry = parse_industry(industry)?;
    let description = match (description, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => read_text(path)?,
        (None, None) => String::new(),
    };

    let request = GenerationRequest::new(description, title, industry);
    let outcome = Orchestrator::from_config(config).generate(&request).await?;
    emit_outcome(title, industry, &outcome, json, output)
}

/// Execute the guided command
pub async fn execute_guided_command(
    title: &str,
    industry: &str,
    answers: &Path,
    json: bool,
    output: Option<&Path>,
    config: &Config,
) -> Result<ExitCode> {
    let industry = parse_industry(industry)?;
    let raw = read_text(answers)?;
    let answers = parse_answers(&raw)
        .with_context(|| format!("Failed to parse answers in {}", answers.display()))?;

    let request = GuidedRequest::new(title, industry, answers);
    let outcome = Orchestrator::from_config(config)
        .generate_guided(&request)
        .await?;
    emit_outcome(title, industry, &outcome, json, output)
}

/// Read a JSON object of answers. Scalars are stringified; nulls are dropped.
fn parse_answers(raw: &str) -> Result<BTreeMap<String, String>, serde_json::Error> {
    let values: BTreeMap<String, Value> = serde_json::from_str(raw)?;
    Ok(values
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

fn emit_outcome(
    title: &str,
    industry: Industry,
    outcome: &GenerationOutcome,
    json: bool,
    output: Option<&Path>,
) -> Result<ExitCode> {
    if json {
        let body = json!({
            "title": title.trim(),
            "industry": industry,
            "document": outcome.document,
            "report": outcome.report,
        });
        write_output(&serde_json::to_string_pretty(&body)?, output)?;
    } else {
        write_output(&outcome.document.xml, output)?;
    }

    let metadata = &outcome.document.metadata;
    eprintln!(
        "  {} tasks, {} gateways, {} events, complexity {}",
        metadata.task_count, metadata.gateway_count, metadata.event_count, metadata.complexity
    );
    Ok(finish_report("Generated", &outcome.report))
}
