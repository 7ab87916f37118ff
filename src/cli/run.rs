//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Creates the tokio runtime
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::{CliArgs, Config, ExitCode, SynthError};
use procsynth_utils::logging::init_tracing;

/// Main CLI execution function.
///
/// All output, errors included, is printed here. main.rs only calls
/// `std::process::exit(code.as_i32())` on `Err`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("⚠ Logging unavailable: {e}");
    }

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        provider: cli.provider.clone(),
        fallback_provider: cli.fallback_provider.clone(),
        call_timeout_secs: cli.call_timeout,
        model: cli.model.clone(),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = SynthError::from(err);
            eprint!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Generate {
                title,
                industry,
                description,
                file,
                json,
                output,
            } => {
                commands::execute_generate_command(
                    &title,
                    &industry,
                    description.as_deref(),
                    file.as_deref(),
                    json,
                    output.as_deref(),
                    &config,
                )
                .await
            }
            Commands::Guided {
                title,
                industry,
                answers,
                json,
                output,
            } => {
                commands::execute_guided_command(
                    &title,
                    &industry,
                    &answers,
                    json,
                    output.as_deref(),
                    &config,
                )
                .await
            }
            Commands::Optimize {
                input,
                industry,
                goals,
                history,
                json,
                output,
            } => {
                commands::execute_optimize_command(
                    &input,
                    &industry,
                    &goals,
                    history.as_deref(),
                    json,
                    output.as_deref(),
                    &config,
                )
                .await
            }
            Commands::Validate { file, strict } => commands::execute_validate_command(&file, strict),
            Commands::Assess { file } => commands::execute_assess_command(&file),
            Commands::Config => commands::execute_config_command(&config),
        }
    });

    match result {
        Ok(code) if code == ExitCode::SUCCESS => Ok(()),
        Ok(code) => Err(code),
        Err(error) => Err(report_error(&error)),
    }
}

/// Print `error` for the user and pick the exit code.
fn report_error(error: &anyhow::Error) -> ExitCode {
    if let Some(synth_error) = error.downcast_ref::<SynthError>() {
        eprint!("{}", synth_error.display_for_user());
        return synth_error.to_exit_code();
    }

    eprintln!("✗ {error:#}");
    if error.downcast_ref::<serde_json::Error>().is_some() {
        eprintln!("\n  Check that the file holds valid JSON of the expected shape");
        return ExitCode::CLI_ARGS;
    }
    eprintln!("\n  Run with --verbose for more detailed output");
    ExitCode::INTERNAL
}
