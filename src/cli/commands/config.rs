//! Config command implementation

use anyhow::Result;

use crate::{Config, ExitCode};

/// Execute the config command
pub fn execute_config_command(config: &Config) -> Result<ExitCode> {
    println!("Effective configuration:");
    for (key, (value, source)) in config.effective_config() {
        println!("  {key} = {value} [{source}]");
    }

    if config.llm.primary_provider().is_none() && config.llm.secondary_provider().is_none() {
        println!("\nNo external generator configured; documents come from the local pipeline.");
    }
    Ok(ExitCode::SUCCESS)
}
