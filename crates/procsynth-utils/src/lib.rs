//! Foundation utilities for procsynth
//!
//! Shared by every other crate in the workspace: the error taxonomy, the small
//! domain enums that cross crate boundaries, CLI exit codes, and tracing setup.

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod types;

pub use error::{
    ConfigError, ErrorCategory, GeneratorError, InputError, SynthError, UserFriendlyError,
    ValidationError,
};
pub use exit_codes::ExitCode;
pub use types::{Complexity, ConfigSource, Industry};
