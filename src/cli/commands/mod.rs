//! CLI command implementations (facade).
//!
//! Handlers return the exit code to use on success: a document produced
//! while a provider reported exhausted quota still exits with
//! `ExitCode::QUOTA_ALERT`.

mod common;
mod config;
mod generate;
mod inspect;
mod optimize;

pub use config::execute_config_command;
pub use generate::{execute_generate_command, execute_guided_command};
pub use inspect::{execute_assess_command, execute_validate_command};
pub use optimize::execute_optimize_command;
