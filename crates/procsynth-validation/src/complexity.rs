//! Element counting, complexity rating, and document metadata

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

use procsynth_utils::types::Complexity;

use crate::validator::{DEFINITIONS_CLOSE, DEFINITIONS_OPEN};

/// Upper bound (inclusive) of the `low` band
pub const LOW_MAX: usize = 5;
/// Upper bound (inclusive) of the `medium` band
pub const MEDIUM_MAX: usize = 15;

// task, userTask, serviceTask, ...
static TASK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<bpmn:(?:\w*T|t)ask\b").unwrap());
static GATEWAY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<bpmn:\w*[Gg]ateway").unwrap());
static EVENT_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<bpmn:\w*[Ee]vent").unwrap());
static PROCESS_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<bpmn:process[\s>/]").unwrap());
static FLOW_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<bpmn:sequenceFlow\b").unwrap());

/// Raised when a document is too broken to count; never leaves this module.
#[derive(Error, Debug)]
enum StructuralAssessmentError {
    #[error("document is empty")]
    Empty,
    #[error("document has no complete bpmn:definitions root")]
    NoDefinitions,
}

/// Task-like, gateway-like and event-like element counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementCounts {
    pub tasks: usize,
    pub gateways: usize,
    pub events: usize,
}

impl ElementCounts {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.tasks + self.gateways + self.events
    }
}

/// Count opening tags by structural pattern.
#[must_use]
pub fn count_elements(xml: &str) -> ElementCounts {
    ElementCounts {
        tasks: TASK_TAG.find_iter(xml).count(),
        gateways: GATEWAY_TAG.find_iter(xml).count(),
        events: EVENT_TAG.find_iter(xml).count(),
    }
}

/// Map an element total onto the fixed bands.
#[must_use]
pub const fn complexity_for_total(total: usize) -> Complexity {
    if total <= LOW_MAX {
        Complexity::Low
    } else if total <= MEDIUM_MAX {
        Complexity::Medium
    } else {
        Complexity::High
    }
}

fn try_assess(xml: &str) -> Result<Complexity, StructuralAssessmentError> {
    if xml.trim().is_empty() {
        return Err(StructuralAssessmentError::Empty);
    }
    if !xml.contains(DEFINITIONS_OPEN) || !xml.contains(DEFINITIONS_CLOSE) {
        return Err(StructuralAssessmentError::NoDefinitions);
    }
    let counts = count_elements(xml);
    debug!(
        tasks = counts.tasks,
        gateways = counts.gateways,
        events = counts.events,
        "Counted process elements"
    );
    Ok(complexity_for_total(counts.total()))
}

/// Rate a document low, medium or high. Never fails: documents that cannot
/// be assessed rate `medium`.
#[must_use]
pub fn assess_complexity(xml: &str) -> Complexity {
    try_assess(xml).unwrap_or_else(|e| {
        warn!(error = %e, "Complexity assessment failed, defaulting to medium");
        Complexity::Medium
    })
}

/// Derived facts attached to every returned document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetadata {
    pub process_count: usize,
    pub task_count: usize,
    pub gateway_count: usize,
    pub event_count: usize,
    pub flow_count: usize,
    pub complexity: Complexity,
}

#[must_use]
pub fn extract_metadata(xml: &str) -> ProcessMetadata {
    let counts = count_elements(xml);
    ProcessMetadata {
        process_count: PROCESS_TAG.find_iter(xml).count(),
        task_count: counts.tasks,
        gateway_count: counts.gateways,
        event_count: counts.events,
        flow_count: FLOW_TAG.find_iter(xml).count(),
        complexity: assess_complexity(xml),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(tasks: usize, gateways: usize) -> String {
        let mut body = String::from("<bpmn:startEvent id=\"s\" />\n");
        for i in 0..tasks {
            body.push_str(&format!("<bpmn:task id=\"t{i}\"></bpmn:task>\n"));
        }
        for i in 0..gateways {
            body.push_str(&format!("<bpmn:exclusiveGateway id=\"g{i}\" />\n"));
        }
        body.push_str("<bpmn:endEvent id=\"e\" />\n");
        format!(
            "<bpmn:definitions>\n<bpmn:process id=\"p\">\n{body}</bpmn:process>\n</bpmn:definitions>"
        )
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(complexity_for_total(0), Complexity::Low);
        assert_eq!(complexity_for_total(5), Complexity::Low);
        assert_eq!(complexity_for_total(6), Complexity::Medium);
        assert_eq!(complexity_for_total(15), Complexity::Medium);
        assert_eq!(complexity_for_total(16), Complexity::High);
    }

    #[test]
    fn test_assess_counts_all_three_kinds() {
        // 2 events + 3 tasks = 5
        assert_eq!(assess_complexity(&document(3, 0)), Complexity::Low);
        // 2 events + 3 tasks + 1 gateway = 6
        assert_eq!(assess_complexity(&document(3, 1)), Complexity::Medium);
        // 2 + 10 + 4 = 16
        assert_eq!(assess_complexity(&document(10, 4)), Complexity::High);
    }

    #[test]
    fn test_task_variants_are_counted() {
        let xml = "<bpmn:userTask id=\"a\" /><bpmn:serviceTask id=\"b\" /><bpmn:task id=\"c\" />";
        assert_eq!(count_elements(xml).tasks, 3);
    }

    #[test]
    fn test_closing_tags_are_not_counted() {
        let counts = count_elements("<bpmn:task id=\"t\"></bpmn:task>");
        assert_eq!(counts.tasks, 1);
    }

    #[test]
    fn test_malformed_input_rates_medium() {
        assert_eq!(assess_complexity(""), Complexity::Medium);
        assert_eq!(assess_complexity("not xml at all"), Complexity::Medium);
        assert_eq!(
            assess_complexity("<bpmn:definitions><bpmn:task />"),
            Complexity::Medium
        );
    }

    #[test]
    fn test_metadata_counts_processes_and_flows() {
        let xml = document(2, 1).replace(
            "</bpmn:process>",
            "<bpmn:sequenceFlow id=\"f1\" /><bpmn:sequenceFlow id=\"f2\" />\n</bpmn:process>",
        );
        let metadata = extract_metadata(&xml);
        assert_eq!(metadata.process_count, 1);
        assert_eq!(metadata.task_count, 2);
        assert_eq!(metadata.gateway_count, 1);
        assert_eq!(metadata.event_count, 2);
        assert_eq!(metadata.flow_count, 2);
        assert_eq!(metadata.complexity, Complexity::Low);
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let json = serde_json::to_value(extract_metadata(&document(1, 0))).unwrap();
        assert_eq!(json["taskCount"], 1);
        assert_eq!(json["complexity"], "low");
    }
}
