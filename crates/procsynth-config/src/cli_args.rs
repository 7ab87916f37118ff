use std::path::PathBuf;

/// Configuration overrides supplied on the command line.
///
/// Every field is optional; `None` leaves the file or default value in place.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit configuration file path (skips discovery)
    pub config_path: Option<PathBuf>,
    /// Primary provider override
    pub provider: Option<String>,
    /// Secondary provider override
    pub fallback_provider: Option<String>,
    /// Per-call timeout override in seconds
    pub call_timeout_secs: Option<u64>,
    /// Model override for the primary provider
    pub model: Option<String>,
}
