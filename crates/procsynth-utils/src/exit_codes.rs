//! Exit code constants for the procsynth CLI.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid arguments, input, or configuration |
//! | 3 | `VALIDATION_FAILED` | Document failed BPMN validation |
//! | 4 | `QUOTA_ALERT` | Provider quota exhausted (a fallback diagram may still exist) |

/// Exit codes matching the documented exit code table.
///
/// Use [`SynthError::to_exit_code()`](crate::SynthError::to_exit_code) to map
/// library errors to a code:
///
/// ```rust
/// use procsynth_utils::{ExitCode, InputError, SynthError};
///
/// let err = SynthError::from(InputError::EmptyAnswers);
/// assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
/// assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments, request input, or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Validation failed - document is not well-formed BPMN
    pub const VALIDATION_FAILED: ExitCode = ExitCode(3);

    /// Quota alert - provider quota or billing exhausted
    pub const QUOTA_ALERT: ExitCode = ExitCode(4);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::VALIDATION_FAILED.as_i32(), 3);
        assert_eq!(ExitCode::QUOTA_ALERT.as_i32(), 4);
        assert_eq!(ExitCode::from_i32(3), ExitCode::VALIDATION_FAILED);
        assert_eq!(i32::from(ExitCode::QUOTA_ALERT), 4);
    }
}
