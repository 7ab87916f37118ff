//! CLI module for procsynth
//!
//! - `args`: clap argument definitions
//! - `commands`: one handler per subcommand
//! - `run`: parsing, configuration discovery, dispatch and error output

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands};
pub use run::run;
