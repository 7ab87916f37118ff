//! BPMN 2.0 document serialization

use procsynth_graph::{DiagramLayout, NodeKind, ProcessGraph, ProcessNode, SequenceFlow};
use tracing::debug;

use crate::element::Element;

pub const BPMN_MODEL_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
pub const BPMN_DI_NS: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
pub const DD_DC_NS: &str = "http://www.omg.org/spec/DD/20100524/DC";
pub const DD_DI_NS: &str = "http://www.omg.org/spec/DD/20100524/DI";
pub const TARGET_NS: &str = "http://bpmn.io/schema/bpmn";

pub const DEFINITIONS_ID: &str = "Definitions_1";
pub const PROCESS_ID: &str = "Process_1";
pub const DIAGRAM_ID: &str = "BPMNDiagram_1";
pub const PLANE_ID: &str = "BPMNPlane_1";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn di_id(element_id: &str) -> String {
    format!("{element_id}_di")
}

fn node_element(node: &ProcessNode) -> Element {
    Element::new(format!("bpmn:{}", node.kind.element_name()))
        .attr("id", &node.id)
        .attr("name", &node.name)
        .child_opt(
            node.incoming
                .as_ref()
                .map(|flow| Element::new("bpmn:incoming").text(flow.as_str())),
        )
        .child_opt(
            node.outgoing
                .as_ref()
                .map(|flow| Element::new("bpmn:outgoing").text(flow.as_str())),
        )
}

fn flow_element(flow: &SequenceFlow) -> Element {
    Element::new("bpmn:sequenceFlow")
        .attr("id", &flow.id)
        .attr("sourceRef", &flow.source_ref)
        .attr("targetRef", &flow.target_ref)
}

fn process_element(graph: &ProcessGraph, process_name: &str) -> Element {
    let mut process = Element::new("bpmn:process").attr("id", PROCESS_ID);
    let name = process_name.trim();
    if name.chars().any(|c| !c.is_control()) {
        process = process.attr("name", name);
    }
    process
        .attr("isExecutable", true)
        .children(graph.nodes.iter().map(node_element))
        .children(graph.flows.iter().map(flow_element))
}

fn diagram_element(layout: &DiagramLayout) -> Element {
    let shapes = layout.shapes.iter().map(|shape| {
        let mut el = Element::new("bpmndi:BPMNShape")
            .attr("id", di_id(&shape.element_id))
            .attr("bpmnElement", &shape.element_id);
        if shape.marker_visible {
            el = el.attr("isMarkerVisible", true);
        }
        el.child(
            Element::new("dc:Bounds")
                .attr("x", shape.bounds.x)
                .attr("y", shape.bounds.y)
                .attr("width", shape.bounds.width)
                .attr("height", shape.bounds.height),
        )
    });

    let edges = layout.edges.iter().map(|edge| {
        Element::new("bpmndi:BPMNEdge")
            .attr("id", di_id(&edge.flow_id))
            .attr("bpmnElement", &edge.flow_id)
            .children(edge.waypoints.iter().map(|p| {
                Element::new("di:waypoint")
                    .attr("x", p.x)
                    .attr("y", p.y)
            }))
    });

    Element::new("bpmndi:BPMNDiagram").attr("id", DIAGRAM_ID).child(
        Element::new("bpmndi:BPMNPlane")
            .attr("id", PLANE_ID)
            .attr("bpmnElement", PROCESS_ID)
            .children(shapes)
            .children(edges),
    )
}

/// Render a graph and its layout as a BPMN 2.0 document.
///
/// Output is a pure function of the inputs: identical graphs, layouts and
/// names produce byte-identical XML. `process_name` becomes the process
/// `name` attribute and is omitted when blank.
#[must_use]
pub fn serialize(graph: &ProcessGraph, layout: &DiagramLayout, process_name: &str) -> String {
    let root = Element::new("bpmn:definitions")
        .attr("xmlns:bpmn", BPMN_MODEL_NS)
        .attr("xmlns:bpmndi", BPMN_DI_NS)
        .attr("xmlns:dc", DD_DC_NS)
        .attr("xmlns:di", DD_DI_NS)
        .attr("id", DEFINITIONS_ID)
        .attr("targetNamespace", TARGET_NS)
        .child(process_element(graph, process_name))
        .child(diagram_element(layout));

    let xml = format!("{XML_DECLARATION}\n{}\n", root.render());
    debug!(
        nodes = graph.nodes.len(),
        gateways = graph.count(NodeKind::ExclusiveGateway),
        bytes = xml.len(),
        "Serialized BPMN document"
    );
    xml
}
