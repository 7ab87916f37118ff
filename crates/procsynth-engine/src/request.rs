//! Request types and input validation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use procsynth_utils::error::InputError;
use procsynth_utils::types::Industry;

pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;
pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn check_title(title: &str) -> Result<(), InputError> {
    let actual = char_len(title);
    if (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&actual) {
        Ok(())
    } else {
        Err(InputError::TitleLength {
            actual,
            min: TITLE_MIN_CHARS,
            max: TITLE_MAX_CHARS,
        })
    }
}

/// Free-text generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub description: String,
    pub title: String,
    #[serde(default)]
    pub industry: Industry,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        title: impl Into<String>,
        industry: Industry,
    ) -> Self {
        Self {
            description: description.into(),
            title: title.into(),
            industry,
        }
    }

    /// Check description and title lengths.
    pub fn validate(&self) -> Result<(), InputError> {
        let actual = char_len(&self.description);
        if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&actual) {
            return Err(InputError::DescriptionLength {
                actual,
                min: DESCRIPTION_MIN_CHARS,
                max: DESCRIPTION_MAX_CHARS,
            });
        }
        check_title(&self.title)
    }
}

/// Questionnaire-driven generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedRequest {
    pub title: String,
    pub industry: Industry,
    pub answers: BTreeMap<String, String>,
}

impl GuidedRequest {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        industry: Industry,
        answers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            title: title.into(),
            industry,
            answers,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        check_title(&self.title)?;
        if self.answers.values().all(|v| v.trim().is_empty()) {
            return Err(InputError::EmptyAnswers);
        }
        Ok(())
    }
}

/// Optimization of an existing document against free-text goals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub document: String,
    pub industry: Industry,
    #[serde(default)]
    pub goals: BTreeMap<String, String>,
}

impl OptimizeRequest {
    #[must_use]
    pub fn new(
        document: impl Into<String>,
        industry: Industry,
        goals: BTreeMap<String, String>,
    ) -> Self {
        Self {
            document: document.into(),
            industry,
            goals,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.document.trim().is_empty() {
            return Err(InputError::MissingField {
                field: "document".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_length_bounds() {
        let ok = GenerationRequest::new("Approve each invoice", "Invoices", Industry::Finance);
        assert!(ok.validate().is_ok());

        let short = GenerationRequest::new("too short", "Invoices", Industry::Finance);
        assert_eq!(
            short.validate(),
            Err(InputError::DescriptionLength {
                actual: 9,
                min: 10,
                max: 5000
            })
        );

        let long = GenerationRequest::new("x".repeat(5001), "Invoices", Industry::Finance);
        assert!(matches!(
            long.validate(),
            Err(InputError::DescriptionLength { actual: 5001, .. })
        ));

        let exact = GenerationRequest::new("x".repeat(5000), "abc", Industry::General);
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn test_lengths_count_surrounding_whitespace() {
        let padded = GenerationRequest::new("  approve   ", " ab ", Industry::General);
        assert!(padded.validate().is_ok());

        let title = GenerationRequest::new("Approve each invoice", "ab", Industry::General);
        assert_eq!(
            title.validate(),
            Err(InputError::TitleLength {
                actual: 2,
                min: 3,
                max: 200
            })
        );

        let over = GenerationRequest::new(format!(" {} ", "x".repeat(4999)), "abc", Industry::General);
        assert!(matches!(
            over.validate(),
            Err(InputError::DescriptionLength { actual: 5001, .. })
        ));
    }

    #[test]
    fn test_guided_requires_a_non_empty_answer() {
        let mut answers = BTreeMap::new();
        answers.insert("main_steps".to_string(), "   ".to_string());
        let request = GuidedRequest::new("Onboarding", Industry::General, answers.clone());
        assert_eq!(request.validate(), Err(InputError::EmptyAnswers));

        answers.insert("participants".to_string(), "HR".to_string());
        let request = GuidedRequest::new("Onboarding", Industry::General, answers);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_optimize_requires_document() {
        let request = OptimizeRequest::new(" ", Industry::General, BTreeMap::new());
        assert!(matches!(
            request.validate(),
            Err(InputError::MissingField { field }) if field == "document"
        ));
    }

    #[test]
    fn test_generation_request_deserializes_with_default_industry() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"description":"Pack and ship orders","title":"Ship"}"#)
                .unwrap();
        assert_eq!(request.industry, Industry::General);
    }
}
