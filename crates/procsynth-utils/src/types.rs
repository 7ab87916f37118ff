//! Domain enums shared across procsynth crates

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::InputError;

/// Industry context attached to every generation request.
///
/// The value is passed verbatim into prompt templates and stored alongside the
/// resulting document. Parsing is case-insensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Industry {
    #[default]
    General,
    Manufacturing,
    Healthcare,
    Finance,
}

impl Industry {
    /// Parse an industry name, mapping unknown values to [`InputError::UnknownIndustry`].
    pub fn parse(value: &str) -> Result<Self, InputError> {
        value
            .trim()
            .parse::<Self>()
            .map_err(|_| InputError::UnknownIndustry {
                value: value.to_string(),
            })
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Manufacturing => "manufacturing",
            Self::Healthcare => "healthcare",
            Self::Finance => "finance",
        }
    }
}

/// Coarse size rating of a process document.
///
/// Ordered `Low < Medium < High` so callers can compare against a floor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Where a configuration value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Cli,
    Config,
    Programmatic,
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Config => write!(f, "config"),
            Self::Programmatic => write!(f, "programmatic"),
            Self::Default => write!(f, "default"),
        }
    }
}
