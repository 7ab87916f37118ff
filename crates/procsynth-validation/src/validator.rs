//! Structural checks applied to every document before it is returned

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, error};

use procsynth_utils::error::ValidationError;

pub const DEFINITIONS_OPEN: &str = "<bpmn:definitions";
pub const DEFINITIONS_CLOSE: &str = "</bpmn:definitions>";

/// Elements the structural variant requires, without the leading `<`
pub const REQUIRED_ELEMENTS: &[&str] = &[
    "bpmn:definitions",
    "bpmn:process",
    "bpmn:startEvent",
    "bpmn:endEvent",
];

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Opening `bpmn:process` tags only, not `bpmn:processType` or similar
static PROCESS_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<bpmn:process[\s>/]").unwrap());

/// Normalize a document: trim, convert line endings to `\n`, collapse blank
/// lines. Idempotent.
#[must_use]
pub fn clean(xml: &str) -> String {
    let normalized = xml.trim().replace("\r\n", "\n").replace('\r', "\n");
    BLANK_LINES.replace_all(&normalized, "\n").into_owned()
}

fn check_envelope(xml: &str) -> Result<(), ValidationError> {
    if xml.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if !xml.contains(DEFINITIONS_OPEN) {
        return Err(ValidationError::MissingDefinitions);
    }
    if !xml.contains(DEFINITIONS_CLOSE) {
        return Err(ValidationError::MalformedStructure);
    }
    Ok(())
}

fn check_structure(xml: &str) -> Result<(), ValidationError> {
    let missing: Vec<String> = REQUIRED_ELEMENTS
        .iter()
        .filter(|element| !xml.contains(&format!("<{element}")))
        .map(|element| (*element).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingElements { elements: missing });
    }

    let found = PROCESS_OPEN.find_iter(xml).count();
    if found != 1 {
        return Err(ValidationError::ProcessCount { found });
    }
    Ok(())
}

/// Check that `xml` has a `bpmn:definitions` envelope and return it cleaned.
///
/// Checks run in order (non-empty, opening tag, closing tag) and the first
/// failure is returned.
pub fn validate(xml: &str) -> Result<String, ValidationError> {
    check_envelope(xml).inspect_err(|e| error!(error = %e, "Document validation failed"))?;
    let cleaned = clean(xml);
    debug!(bytes = cleaned.len(), "Document validated");
    Ok(cleaned)
}

/// [`validate`] plus the required-element set and a single process element.
pub fn validate_strict(xml: &str) -> Result<String, ValidationError> {
    check_envelope(xml)
        .and_then(|()| check_structure(xml))
        .inspect_err(|e| error!(error = %e, "Document validation failed"))?;
    let cleaned = clean(xml);
    debug!(bytes = cleaned.len(), "Document validated (strict)");
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="Definitions_1">
  <bpmn:process id="Process_1" isExecutable="true">
    <bpmn:startEvent id="StartEvent_1" />
    <bpmn:endEvent id="EndEvent_1" />
  </bpmn:process>
</bpmn:definitions>"#;

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(validate(""), Err(ValidationError::Empty));
        assert_eq!(validate(" \n\t "), Err(ValidationError::Empty));
    }

    #[test]
    fn test_missing_definitions() {
        assert_eq!(
            validate("<bpmn:process id=\"p\"></bpmn:process>"),
            Err(ValidationError::MissingDefinitions)
        );
    }

    #[test]
    fn test_missing_closing_tag() {
        assert_eq!(
            validate("<bpmn:definitions id=\"d\"><bpmn:process id=\"p\" />"),
            Err(ValidationError::MalformedStructure)
        );
    }

    #[test]
    fn test_valid_document_is_cleaned() {
        let messy = format!("\r\n  {}\r\n\r\n", MINIMAL.replace('\n', "\r\n\r\n"));
        let cleaned = validate(&messy).unwrap();
        assert_eq!(cleaned, MINIMAL);
    }

    #[test]
    fn test_clean_collapses_whitespace_only_lines() {
        assert_eq!(clean("a\n   \n\t\n  b\rc"), "a\n  b\nc");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let input = "  <a>\r\n\r\n \n<b/>\r\r</a>\n\n";
        let once = clean(input);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let once = validate(MINIMAL).unwrap();
        assert_eq!(validate(&once).unwrap(), once);
    }

    #[test]
    fn test_strict_names_every_missing_element() {
        let xml = "<bpmn:definitions><bpmn:process id=\"p\"></bpmn:process></bpmn:definitions>";
        assert!(validate(xml).is_ok());
        assert_eq!(
            validate_strict(xml),
            Err(ValidationError::MissingElements {
                elements: vec!["bpmn:startEvent".into(), "bpmn:endEvent".into()]
            })
        );
    }

    #[test]
    fn test_strict_requires_exactly_one_process() {
        let xml = MINIMAL.replace(
            "</bpmn:definitions>",
            "<bpmn:process id=\"Process_2\" />\n</bpmn:definitions>",
        );
        assert_eq!(
            validate_strict(&xml),
            Err(ValidationError::ProcessCount { found: 2 })
        );
        assert!(validate_strict(MINIMAL).is_ok());
    }

    #[test]
    fn test_strict_checks_envelope_first() {
        assert_eq!(validate_strict(""), Err(ValidationError::Empty));
        assert_eq!(
            validate_strict("<bpmn:startEvent />"),
            Err(ValidationError::MissingDefinitions)
        );
    }
}
