//! Optimize command implementation
//!
//! Handles `procsynth optimize`. With `--history`, the file is read (a
//! missing file starts an empty history), the new record appended, and the
//! file rewritten only after the optimization succeeded.

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::common::{finish_report, parse_industry, read_text, write_output};
use crate::{Config, ExitCode, OptimizationHistory, OptimizeRequest, Orchestrator};
use procsynth_engine::goals_from_pairs;

/// Execute the optimize command
pub async fn execute_optimize_command(
    input: &Path,
    industry: &str,
    goals: &[(String, String)],
    history_path: Option<&Path>,
    json: bool,
    output: Option<&Path>,
    config: &Config,
) -> Result<ExitCode> {
    let industry = parse_industry(industry)?;
    let document = read_text(input)?;
    let goals = goals_from_pairs(goals.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let mut history = match history_path {
        Some(path) => load_history(path)?,
        None => OptimizationHistory::new(),
    };

    let request = OptimizeRequest::new(document, industry, goals);
    let outcome = Orchestrator::from_config(config)
        .optimize(&request, &mut history)
        .await?;

    if let Some(path) = history_path {
        save_history(path, &history)?;
        debug!(path = %path.display(), records = history.len(), "History saved");
    }

    if json {
        let body = json!({
            "record": outcome.record,
            "summary": outcome.summary,
            "report": outcome.report,
        });
        write_output(&serde_json::to_string_pretty(&body)?, output)?;
    } else {
        write_output(&outcome.record.bpmn_document.xml, output)?;
    }

    eprintln!("  Version {}: {}", outcome.record.version, outcome.summary);
    for change in &outcome.record.changes {
        eprintln!("  - {change}");
    }
    Ok(finish_report("Optimized", &outcome.report))
}

fn load_history(path: &Path) -> Result<OptimizationHistory> {
    if !path.exists() {
        return Ok(OptimizationHistory::new());
    }
    let raw = read_text(path)?;
    if raw.trim().is_empty() {
        return Ok(OptimizationHistory::new());
    }
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse history in {}", path.display()))
}

fn save_history(path: &Path, history: &OptimizationHistory) -> Result<()> {
    let body = serde_json::to_string_pretty(history)?;
    fs::write(path, format!("{body}\n"))
        .with_context(|| format!("Failed to write history to {}", path.display()))
}
