//! Process graph types

use serde::{Deserialize, Serialize};

/// Node variants of the deterministic process graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    StartEvent,
    Task,
    ExclusiveGateway,
    EndEvent,
}

impl NodeKind {
    /// Element name inside the `bpmn` namespace
    #[must_use]
    pub const fn element_name(&self) -> &'static str {
        match self {
            Self::StartEvent => "startEvent",
            Self::Task => "task",
            Self::ExclusiveGateway => "exclusiveGateway",
            Self::EndEvent => "endEvent",
        }
    }

    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(self, Self::StartEvent | Self::EndEvent)
    }
}

/// One node on the process path.
///
/// `incoming`/`outgoing` hold at most one flow id each: the deterministic
/// graph is a simple path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessNode {
    pub kind: NodeKind,
    pub id: String,
    pub name: String,
    pub incoming: Option<String>,
    pub outgoing: Option<String>,
}

impl ProcessNode {
    pub(crate) fn new(kind: NodeKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            incoming: None,
            outgoing: None,
        }
    }
}

/// Directed edge between two consecutive nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceFlow {
    pub id: String,
    pub source_ref: String,
    pub target_ref: String,
}

/// Ordered nodes plus the flows connecting them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessGraph {
    pub nodes: Vec<ProcessNode>,
    pub flows: Vec<SequenceFlow>,
}

impl ProcessGraph {
    /// Thread `Flow_k` edges through `nodes` in order.
    #[must_use]
    pub fn from_path(mut nodes: Vec<ProcessNode>) -> Self {
        let mut flows = Vec::with_capacity(nodes.len().saturating_sub(1));

        for i in 1..nodes.len() {
            let flow_id = format!("Flow_{i}");
            nodes[i - 1].outgoing = Some(flow_id.clone());
            nodes[i].incoming = Some(flow_id.clone());
            flows.push(SequenceFlow {
                id: flow_id,
                source_ref: nodes[i - 1].id.clone(),
                target_ref: nodes[i].id.clone(),
            });
        }

        Self { nodes, flows }
    }

    #[must_use]
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Check the path shape: exactly one start with no incoming edge first,
    /// exactly one end with no outgoing edge last, and every other node with
    /// one edge on each side.
    #[must_use]
    pub fn is_simple_path(&self) -> bool {
        let (Some(first), Some(last)) = (self.nodes.first(), self.nodes.last()) else {
            return false;
        };
        if first.kind != NodeKind::StartEvent || last.kind != NodeKind::EndEvent {
            return false;
        }
        if self.count(NodeKind::StartEvent) != 1 || self.count(NodeKind::EndEvent) != 1 {
            return false;
        }
        if first.incoming.is_some() || last.outgoing.is_some() {
            return false;
        }

        let n = self.nodes.len();
        let inner_ok = self.nodes.iter().enumerate().all(|(i, node)| {
            (i == 0 || node.incoming.is_some()) && (i == n - 1 || node.outgoing.is_some())
        });

        inner_ok
            && self.flows.len() == n - 1
            && self.flows.iter().enumerate().all(|(i, flow)| {
                flow.source_ref == self.nodes[i].id && flow.target_ref == self.nodes[i + 1].id
            })
    }
}
