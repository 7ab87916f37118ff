//! Configuration management for procsynth
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > config file > defaults. Configuration files are TOML with
//! `[generation]` and `[llm]` sections. A `Config` is built once at startup
//! and treated as read-only afterwards.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::{CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use model::*;
pub use procsynth_utils::types::ConfigSource;
