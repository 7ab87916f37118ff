use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use procsynth_utils::error::ConfigError;

use super::{CliArgs, Config, ConfigSource, GenerationConfig, LlmConfig};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "PROCSYNTH_CONFIG";

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "procsynth.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    generation: Option<GenerationConfig>,
    llm: Option<LlmConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the working directory cannot be read, a named
    /// file is missing or unparseable, or the merged result fails validation.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = env::current_dir()
            .map_err(|e| ConfigError::InvalidFile(format!("cannot read current directory: {e}")))?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// Path-driven variant used by tests to avoid depending on the process
    /// working directory.
    ///
    /// # Errors
    ///
    /// See [`Config::discover`].
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        let config_path = match &cli_args.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading configuration file");
            let file_config = Self::load_config_file(path)?;
            config.apply_file(file_config);
        }

        config.apply_cli(cli_args);
        config.validate()?;
        Ok(config)
    }

    /// Locate a configuration file.
    ///
    /// Order: `PROCSYNTH_CONFIG`, then `<start_dir>/procsynth.toml`, then
    /// `<user config dir>/procsynth/config.toml`.
    fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        if let Ok(from_env) = env::var(CONFIG_ENV_VAR)
            && !from_env.trim().is_empty()
        {
            return Some(PathBuf::from(from_env));
        }

        let local = start_dir.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("procsynth").join("config.toml"))
            .filter(|path| path.is_file())
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))
    }

    fn apply_file(&mut self, file: TomlConfig) {
        let source = ConfigSource::Config;

        if let Some(generation) = file.generation {
            if let Some(attempts) = generation.max_rate_limit_attempts {
                self.generation.max_rate_limit_attempts = Some(attempts);
                self.attribute("max_rate_limit_attempts", source);
            }
            if let Some(delay) = generation.base_delay_ms {
                self.generation.base_delay_ms = Some(delay);
                self.attribute("base_delay_ms", source);
            }
            if let Some(timeout) = generation.call_timeout_secs {
                self.generation.call_timeout_secs = Some(timeout);
                self.attribute("call_timeout_secs", source);
            }
        }

        if let Some(llm) = file.llm {
            if llm.provider.is_some() {
                self.llm.provider = llm.provider;
                self.attribute("llm.provider", source);
            }
            if llm.fallback_provider.is_some() {
                self.llm.fallback_provider = llm.fallback_provider;
                self.attribute("llm.fallback_provider", source);
            }
            if llm.openai.is_some() {
                self.llm.openai = llm.openai;
                self.attribute("llm.openai", source);
            }
            if llm.huggingface.is_some() {
                self.llm.huggingface = llm.huggingface;
                self.attribute("llm.huggingface", source);
            }
        }
    }

    fn apply_cli(&mut self, cli_args: &CliArgs) {
        let source = ConfigSource::Cli;

        if let Some(provider) = &cli_args.provider {
            self.llm.provider = Some(provider.clone());
            self.attribute("llm.provider", source);
        }
        if let Some(fallback) = &cli_args.fallback_provider {
            self.llm.fallback_provider = Some(fallback.clone());
            self.attribute("llm.fallback_provider", source);
        }
        if let Some(timeout) = cli_args.call_timeout_secs {
            self.generation.call_timeout_secs = Some(timeout);
            self.attribute("call_timeout_secs", source);
        }
        if let Some(model) = &cli_args.model {
            match self.llm.primary_provider() {
                Some("huggingface") => {
                    self.llm.huggingface.get_or_insert_with(Default::default).model =
                        Some(model.clone());
                }
                _ => {
                    self.llm.openai.get_or_insert_with(Default::default).model =
                        Some(model.clone());
                }
            }
            self.attribute("model", source);
        }
    }

    pub(crate) fn attribute(&mut self, key: &str, source: ConfigSource) {
        self.source_attribution.insert(key.to_string(), source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn clear_env() {
        unsafe {
            env::remove_var(CONFIG_ENV_VAR);
        }
    }

    #[test]
    #[serial]
    fn test_discover_without_file_uses_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let config = Config::discover_from(dir.path(), &CliArgs::default()).unwrap();

        assert_eq!(config.generation.max_rate_limit_attempts(), 3);
        assert_eq!(
            config.source_attribution.get("base_delay_ms"),
            Some(&ConfigSource::Default)
        );
    }

    #[test]
    #[serial]
    fn test_local_file_overrides_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[generation]
base_delay_ms = 250

[llm]
provider = "huggingface"
fallback_provider = "none"

[llm.huggingface]
model = "tiiuae/falcon-7b-instruct"
"#,
        )
        .unwrap();

        let config = Config::discover_from(dir.path(), &CliArgs::default()).unwrap();
        assert_eq!(config.generation.base_delay_ms, Some(250));
        assert_eq!(config.llm.primary_provider(), Some("huggingface"));
        assert_eq!(config.llm.secondary_provider(), None);
        assert_eq!(
            config.source_attribution.get("base_delay_ms"),
            Some(&ConfigSource::Config)
        );
        assert_eq!(
            config.source_attribution.get("max_rate_limit_attempts"),
            Some(&ConfigSource::Default)
        );
    }

    #[test]
    #[serial]
    fn test_cli_overrides_file() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[generation]\ncall_timeout_secs = 30\n",
        )
        .unwrap();

        let cli = CliArgs {
            call_timeout_secs: Some(90),
            provider: Some("none".to_string()),
            ..CliArgs::default()
        };
        let config = Config::discover_from(dir.path(), &cli).unwrap();
        assert_eq!(config.generation.call_timeout_secs, Some(90));
        assert_eq!(config.llm.primary_provider(), None);
        assert_eq!(
            config.source_attribution.get("call_timeout_secs"),
            Some(&ConfigSource::Cli)
        );
    }

    #[test]
    #[serial]
    fn test_env_var_names_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[generation]\nmax_rate_limit_attempts = 5\n").unwrap();
        unsafe {
            env::set_var(CONFIG_ENV_VAR, &path);
        }

        let other = TempDir::new().unwrap();
        let result = Config::discover_from(other.path(), &CliArgs::default());
        clear_env();

        assert_eq!(result.unwrap().generation.max_rate_limit_attempts(), 5);
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file_is_an_error() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let cli = CliArgs {
            config_path: Some(dir.path().join("missing.toml")),
            ..CliArgs::default()
        };
        match Config::discover_from(dir.path(), &cli) {
            Err(ConfigError::NotFound { path }) => assert!(path.ends_with("missing.toml")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_unknown_section_is_rejected() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[runner]\nmode = \"auto\"\n").unwrap();
        assert!(matches!(
            Config::discover_from(dir.path(), &CliArgs::default()),
            Err(ConfigError::InvalidFile(_))
        ));
    }

    #[test]
    #[serial]
    fn test_cli_model_targets_primary_provider() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let cli = CliArgs {
            model: Some("gpt-4o-mini".to_string()),
            ..CliArgs::default()
        };
        let config = Config::discover_from(dir.path(), &cli).unwrap();
        assert_eq!(
            config.llm.openai.as_ref().and_then(|o| o.model.as_deref()),
            Some("gpt-4o-mini")
        );
    }
}
