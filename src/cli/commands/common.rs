//! Helpers shared by command handlers

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::{ExitCode, GenerationReport, Industry};

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write `content` to `output`, or to stdout when no path is given.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, ensure_trailing_newline(content))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{}", ensure_trailing_newline(content));
            Ok(())
        }
    }
}

fn ensure_trailing_newline(content: &str) -> String {
    if content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{content}\n")
    }
}

pub fn parse_industry(raw: &str) -> Result<Industry> {
    Ok(Industry::parse(raw).map_err(crate::SynthError::from)?)
}

/// Summarize how the document was produced on stderr and pick the exit code.
pub fn finish_report(action: &str, report: &GenerationReport) -> ExitCode {
    eprintln!(
        "✓ {action} via {:?} ({} external call{}, {} backoff{})",
        report.source,
        report.attempts,
        if report.attempts == 1 { "" } else { "s" },
        report.backoff_delays.len(),
        if report.backoff_delays.len() == 1 { "" } else { "s" },
    );
    for failure in &report.failures {
        eprintln!("  - {} {}: {}", failure.provider, failure.kind, failure.message);
    }

    if report.quota_exceeded {
        eprintln!("⚠ A provider reported exhausted quota; check billing for the configured keys");
        ExitCode::QUOTA_ALERT
    } else {
        ExitCode::SUCCESS
    }
}
