//! Task list to process path expansion

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::model::{NodeKind, ProcessGraph, ProcessNode};

const DECISION_WORDS: &[&str] = &["check", "verify", "review", "approve"];
const COMPLETION_WORDS: &[&str] = &["complete", "finish", "deliver", "send"];

static DECISION_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)check|verify|review|approve").unwrap());

/// Name of the rejection-handling task inserted after a decision
fn rejection_name(phrase: &str) -> String {
    format!("Handle {}", DECISION_WORD.replace(phrase, "rejection"))
}

fn notification_name(lower: &str) -> &'static str {
    if lower.contains("deliver") {
        "Send delivery notification"
    } else {
        "Send completion notification"
    }
}

/// Expand an ordered task list into a start-to-end process path.
///
/// For task `i` (1-based) the builder emits `Task_i`, then:
///
/// - when the phrase mentions check/verify/review/approve, a `Gateway_i`
///   named "Decision" and a `Task_i_alt` rejection handler
/// - when it mentions complete/finish/deliver/send, a `Task_i_notify`
///   notification task
///
/// Both rules may fire for one task. Decision branches are named but the
/// path is not forked.
#[must_use]
pub fn build_graph<S: AsRef<str>>(tasks: &[S]) -> ProcessGraph {
    let mut nodes = Vec::with_capacity(tasks.len() * 2 + 2);
    nodes.push(ProcessNode::new(NodeKind::StartEvent, "StartEvent_1", "Start"));

    for (index, task) in tasks.iter().enumerate() {
        let i = index + 1;
        let phrase = task.as_ref();
        let lower = phrase.to_lowercase();

        nodes.push(ProcessNode::new(NodeKind::Task, format!("Task_{i}"), phrase));

        if DECISION_WORDS.iter().any(|w| lower.contains(w)) {
            nodes.push(ProcessNode::new(
                NodeKind::ExclusiveGateway,
                format!("Gateway_{i}"),
                "Decision",
            ));
            nodes.push(ProcessNode::new(
                NodeKind::Task,
                format!("Task_{i}_alt"),
                rejection_name(phrase),
            ));
        }

        if COMPLETION_WORDS.iter().any(|w| lower.contains(w)) {
            nodes.push(ProcessNode::new(
                NodeKind::Task,
                format!("Task_{i}_notify"),
                notification_name(&lower),
            ));
        }
    }

    nodes.push(ProcessNode::new(NodeKind::EndEvent, "EndEvent_1", "End"));

    let graph = ProcessGraph::from_path(nodes);
    debug!(
        tasks = tasks.len(),
        nodes = graph.nodes.len(),
        flows = graph.flows.len(),
        "Process graph built"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(graph: &ProcessGraph) -> Vec<&str> {
        graph.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_order_scenario_expansion() {
        let graph = build_graph(&[
            "Verify payment",
            "Check inventory",
            "Ship the product",
            "Send confirmation",
        ]);

        assert_eq!(
            names(&graph),
            vec![
                "Start",
                "Verify payment",
                "Decision",
                "Handle rejection payment",
                "Check inventory",
                "Decision",
                "Handle rejection inventory",
                "Ship the product",
                "Send confirmation",
                "Send completion notification",
                "End",
            ]
        );
        assert_eq!(graph.nodes[2].id, "Gateway_1");
        assert_eq!(graph.nodes[3].id, "Task_1_alt");
        assert_eq!(graph.nodes[9].id, "Task_4_notify");
        assert_eq!(graph.flows.len(), 10);
        assert!(graph.is_simple_path());
    }

    #[test]
    fn test_both_rules_fire_for_one_task() {
        let graph = build_graph(&["Review and deliver report"]);
        let kinds: Vec<NodeKind> = graph.nodes.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::StartEvent,
                NodeKind::Task,
                NodeKind::ExclusiveGateway,
                NodeKind::Task,
                NodeKind::Task,
                NodeKind::EndEvent,
            ]
        );
        assert_eq!(graph.nodes[3].name, "Handle rejection and deliver report");
        assert_eq!(graph.nodes[4].name, "Send delivery notification");
    }

    #[test]
    fn test_rejection_replaces_first_match_case_insensitively() {
        assert_eq!(rejection_name("APPROVE loan"), "Handle rejection loan");
        assert_eq!(
            rejection_name("Double-check and verify"),
            "Handle Double-rejection and verify"
        );
    }

    #[test]
    fn test_plain_task_gets_no_extra_nodes() {
        let graph = build_graph(&["Pack boxes"]);
        assert_eq!(names(&graph), vec!["Start", "Pack boxes", "End"]);
    }

    #[test]
    fn test_empty_task_list_is_start_to_end() {
        let graph = build_graph::<&str>(&[]);
        assert_eq!(names(&graph), vec!["Start", "End"]);
        assert_eq!(graph.flows.len(), 1);
        assert!(graph.is_simple_path());
    }

    #[test]
    fn test_ids_are_stable_for_identical_input() {
        let tasks = ["Check stock", "Complete order"];
        assert_eq!(build_graph(&tasks), build_graph(&tasks));
    }
}
