//! Validate and assess command implementations

use anyhow::Result;
use std::path::Path;

use super::common::read_text;
use crate::{ExitCode, SynthError, extract_metadata, validate, validate_strict};

/// Execute the validate command
pub fn execute_validate_command(file: &Path, strict: bool) -> Result<ExitCode> {
    let raw = read_text(file)?;
    let cleaned = if strict {
        validate_strict(&raw)
    } else {
        validate(&raw)
    }
    .map_err(SynthError::from)?;

    println!("{cleaned}");
    eprintln!("✓ {} is valid", file.display());
    Ok(ExitCode::SUCCESS)
}

/// Execute the assess command
pub fn execute_assess_command(file: &Path) -> Result<ExitCode> {
    let raw = read_text(file)?;
    let metadata = extract_metadata(&raw);
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(ExitCode::SUCCESS)
}
