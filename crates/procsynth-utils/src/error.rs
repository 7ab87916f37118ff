use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Library-level error type for procsynth operations.
///
/// `SynthError` is what the engine surfaces to its caller. The deterministic
/// fallback path never produces one; the variants below come from request
/// validation, document validation, configuration, or I/O at the CLI edge.
///
/// | Variant | Surfaced as | Retried |
/// |---------|-------------|---------|
/// | `Input` | 4xx-equivalent, exit code 2 | never |
/// | `Validation` | malformed document, exit code 3 | never |
/// | `Generator` | only when a caller invokes a backend directly | rate limits only |
/// | `Config` | exit code 2 | never |
///
/// Use [`display_for_user()`](Self::display_for_user) for a formatted message
/// with context and suggestions, and [`to_exit_code()`](Self::to_exit_code)
/// for CLI mapping.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Document validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Generator,
    Validation,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "Input"),
            Self::Configuration => write!(f, "Configuration"),
            Self::Generator => write!(f, "Generator"),
            Self::Validation => write!(f, "Validation"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Request-level input errors. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("description must be {min}..={max} characters, got {actual}")]
    DescriptionLength { actual: usize, min: usize, max: usize },

    #[error("title must be {min}..={max} characters, got {actual}")]
    TitleLength { actual: usize, min: usize, max: usize },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("answers must contain at least one non-empty value")]
    EmptyAnswers,

    #[error("unknown industry '{value}' (expected general, manufacturing, healthcare or finance)")]
    UnknownIndustry { value: String },
}

impl UserFriendlyError for InputError {
    fn user_message(&self) -> String {
        match self {
            Self::DescriptionLength { actual, min, max } => format!(
                "The process description is {actual} characters long; it must be between {min} and {max}"
            ),
            Self::TitleLength { actual, min, max } => format!(
                "The process title is {actual} characters long; it must be between {min} and {max}"
            ),
            Self::MissingField { field } => format!("Required field '{field}' was not provided"),
            Self::EmptyAnswers => "The questionnaire answers are all empty".to_string(),
            Self::UnknownIndustry { value } => format!("'{value}' is not a supported industry"),
        }
    }

    fn context(&self) -> Option<String> {
        None
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DescriptionLength { .. } => vec![
                "Describe the process in a few sentences naming the main steps".to_string(),
            ],
            Self::TitleLength { .. } => vec!["Use a short descriptive title".to_string()],
            Self::MissingField { field } => vec![format!("Provide a value for '{field}'")],
            Self::EmptyAnswers => {
                vec!["Answer at least one question, for example main_steps".to_string()]
            }
            Self::UnknownIndustry { .. } => vec![
                "Use one of: general, manufacturing, healthcare, finance".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}

/// Structural problems found in a process document.
///
/// Raised for malformed XML from any upstream source. A document that fails
/// validation is reported, never repaired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("document must be a non-empty string")]
    Empty,

    #[error("missing bpmn:definitions element")]
    MissingDefinitions,

    #[error("malformed XML structure: missing closing </bpmn:definitions> tag")]
    MalformedStructure,

    #[error("missing required elements: {}", .elements.join(", "))]
    MissingElements { elements: Vec<String> },

    #[error("expected exactly one bpmn:process element, found {found}")]
    ProcessCount { found: usize },
}

impl UserFriendlyError for ValidationError {
    fn user_message(&self) -> String {
        format!("The process document is not valid BPMN: {self}")
    }

    fn context(&self) -> Option<String> {
        Some(
            "Documents are checked for a bpmn:definitions root, a single process, \
             and start/end events before they are returned."
                .to_string(),
        )
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Empty | Self::MissingDefinitions | Self::MalformedStructure => vec![
                "Check that the input is a complete BPMN 2.0 XML document".to_string(),
            ],
            Self::MissingElements { elements } => {
                vec![format!("Add the missing elements: {}", elements.join(", "))]
            }
            Self::ProcessCount { .. } => {
                vec!["Split multi-process collaborations into separate documents".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

/// Failures reported by an external generator.
///
/// Only [`GeneratorError::RateLimited`] is retryable; everything else moves the
/// orchestrator straight to its next stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Provider answered 429
    #[error("rate limited{}", .retry_after_secs.map(|s| format!(" (retry after {s}s)")).unwrap_or_default())]
    RateLimited { retry_after_secs: Option<u64> },

    /// Billing or quota exhausted; an operator needs to act
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Network failure, server error, or unusable response
    #[error("transient error: {0}")]
    Transient(String),

    #[error("timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Missing credentials, rejected credentials, or bad provider settings
    #[error("misconfiguration: {0}")]
    Misconfiguration(String),
}

impl GeneratorError {
    /// Whether the orchestrator may retry the same provider after this error
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Stable short label used in logs and generation reports
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::Transient(_) => "transient",
            Self::Timeout { .. } => "timeout",
            Self::Misconfiguration(_) => "misconfiguration",
        }
    }
}

impl UserFriendlyError for GeneratorError {
    fn user_message(&self) -> String {
        match self {
            Self::RateLimited { .. } => {
                "The process generator is rate limited; please wait a moment".to_string()
            }
            Self::QuotaExceeded(msg) => format!("Generator quota exceeded: {msg}"),
            Self::Transient(msg) => format!("Generator temporarily unavailable: {msg}"),
            Self::Timeout { duration } => format!("Generator timed out after {duration:?}"),
            Self::Misconfiguration(msg) => format!("Generator configuration error: {msg}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::QuotaExceeded(_) => Some(
                "The provider account has run out of quota or credit. A basic diagram \
                 was still produced locally."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RateLimited { .. } => vec!["Wait a minute and try again".to_string()],
            Self::QuotaExceeded(_) => vec![
                "Check the provider's billing and usage dashboard".to_string(),
                "Configure a fallback_provider in [llm]".to_string(),
            ],
            Self::Transient(_) | Self::Timeout { .. } => vec![
                "Check network connectivity".to_string(),
                "Increase call_timeout_secs in [generation]".to_string(),
            ],
            Self::Misconfiguration(_) => vec![
                "Check that the provider API key environment variable is set".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Misconfiguration(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Generator,
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    NotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(msg) => format!("Configuration file could not be parsed: {msg}"),
            Self::MissingRequired(what) => format!("Configuration is missing {what}"),
            Self::InvalidValue { key, value } => format!("Invalid value for '{key}': {value}"),
            Self::NotFound { path } => format!("Configuration file '{path}' does not exist"),
        }
    }

    fn context(&self) -> Option<String> {
        Some(
            "Configuration is read from --config, PROCSYNTH_CONFIG, ./procsynth.toml, \
             or the user config directory."
                .to_string(),
        )
    }

    fn suggestions(&self) -> Vec<String> {
        vec!["Run 'procsynth config' to see the effective configuration".to_string()]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl UserFriendlyError for SynthError {
    fn user_message(&self) -> String {
        match self {
            Self::Input(e) => e.user_message(),
            Self::Validation(e) => e.user_message(),
            Self::Generator(e) => e.user_message(),
            Self::Config(e) => e.user_message(),
            Self::Io(e) => format!("File system operation failed: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Input(e) => e.context(),
            Self::Validation(e) => e.context(),
            Self::Generator(e) => e.context(),
            Self::Config(e) => e.context(),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Input(e) => e.suggestions(),
            Self::Validation(e) => e.suggestions(),
            Self::Generator(e) => e.suggestions(),
            Self::Config(e) => e.suggestions(),
            Self::Io(_) => vec!["Check that the path exists and is readable".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Input(e) => e.category(),
            Self::Validation(e) => e.category(),
            Self::Generator(e) => e.category(),
            Self::Config(e) => e.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl SynthError {
    /// Get a user-friendly error message with context and actionable suggestions.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Input(_) | Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Validation(_) => ExitCode::VALIDATION_FAILED,
            Self::Generator(GeneratorError::QuotaExceeded(_)) => ExitCode::QUOTA_ALERT,
            Self::Generator(GeneratorError::Misconfiguration(_)) => ExitCode::CLI_ARGS,
            Self::Generator(_) | Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}
