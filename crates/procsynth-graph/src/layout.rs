//! Single-lane diagram layout
//!
//! Draft geometry only: nodes sit left to right on one horizontal axis and
//! nothing is done about overlaps.

use serde::{Deserialize, Serialize};

use crate::model::{NodeKind, ProcessGraph};

/// Centre x of the first node
pub const ORIGIN_X: i32 = 180;
/// Shared centre y of every node
pub const LANE_Y: i32 = 100;
/// Horizontal distance between consecutive node centres
pub const COLUMN_PITCH: i32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned box, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    fn centered(center: Point, (width, height): (i32, i32)) -> Self {
        Self {
            x: center.x - width / 2,
            y: center.y - height / 2,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    #[must_use]
    pub const fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }
}

/// Shape size for a node kind
#[must_use]
pub const fn shape_size(kind: NodeKind) -> (i32, i32) {
    match kind {
        NodeKind::StartEvent | NodeKind::EndEvent => (36, 36),
        NodeKind::Task => (120, 80),
        NodeKind::ExclusiveGateway => (50, 50),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeGeometry {
    pub element_id: String,
    pub bounds: Bounds,
    /// Gateways render their marker
    pub marker_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGeometry {
    pub flow_id: String,
    pub waypoints: Vec<Point>,
}

/// Geometry for every node and flow of a graph, in graph order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagramLayout {
    pub shapes: Vec<ShapeGeometry>,
    pub edges: Vec<EdgeGeometry>,
}

impl DiagramLayout {
    #[must_use]
    pub fn shape(&self, element_id: &str) -> Option<&ShapeGeometry> {
        self.shapes.iter().find(|s| s.element_id == element_id)
    }
}

/// Positions nodes on one lane at a fixed pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEngine {
    pub origin_x: i32,
    pub lane_y: i32,
    pub pitch: i32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            origin_x: ORIGIN_X,
            lane_y: LANE_Y,
            pitch: COLUMN_PITCH,
        }
    }
}

impl LayoutEngine {
    /// Assign bounds to each node and two-point waypoints to each flow.
    ///
    /// Edges run horizontally from the source's right edge to the target's
    /// left edge.
    #[must_use]
    pub fn layout(&self, graph: &ProcessGraph) -> DiagramLayout {
        let shapes: Vec<ShapeGeometry> = graph
            .nodes
            .iter()
            .zip(0..)
            .map(|(node, column)| {
                let center = Point {
                    x: self.origin_x + column * self.pitch,
                    y: self.lane_y,
                };
                ShapeGeometry {
                    element_id: node.id.clone(),
                    bounds: Bounds::centered(center, shape_size(node.kind)),
                    marker_visible: node.kind == NodeKind::ExclusiveGateway,
                }
            })
            .collect();

        let edges = graph
            .flows
            .iter()
            .zip(shapes.windows(2))
            .map(|(flow, pair)| EdgeGeometry {
                flow_id: flow.id.clone(),
                waypoints: vec![
                    Point {
                        x: pair[0].bounds.right(),
                        y: self.lane_y,
                    },
                    Point {
                        x: pair[1].bounds.left(),
                        y: self.lane_y,
                    },
                ],
            })
            .collect();

        DiagramLayout { shapes, edges }
    }
}

/// Lay out with the default lane geometry
#[must_use]
pub fn layout(graph: &ProcessGraph) -> DiagramLayout {
    LayoutEngine::default().layout(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_graph;

    #[test]
    fn test_shapes_are_centered_on_lane() {
        let graph = build_graph(&["Check stock"]);
        let diagram = layout(&graph);

        let start = diagram.shape("StartEvent_1").unwrap();
        assert_eq!(
            start.bounds,
            Bounds {
                x: 162,
                y: 82,
                width: 36,
                height: 36
            }
        );

        let task = diagram.shape("Task_1").unwrap();
        assert_eq!(
            task.bounds,
            Bounds {
                x: 370,
                y: 60,
                width: 120,
                height: 80
            }
        );

        let gateway = diagram.shape("Gateway_1").unwrap();
        assert_eq!(
            gateway.bounds,
            Bounds {
                x: 655,
                y: 75,
                width: 50,
                height: 50
            }
        );
        assert!(gateway.marker_visible);
        assert!(!task.marker_visible);

        for shape in &diagram.shapes {
            assert_eq!(shape.bounds.center_y(), LANE_Y);
        }
    }

    #[test]
    fn test_edges_connect_trailing_to_leading_edge() {
        let graph = build_graph(&["Pack boxes"]);
        let diagram = layout(&graph);

        assert_eq!(diagram.edges.len(), 2);
        assert_eq!(
            diagram.edges[0].waypoints,
            vec![Point { x: 198, y: 100 }, Point { x: 370, y: 100 }]
        );
        assert_eq!(
            diagram.edges[1].waypoints,
            vec![Point { x: 490, y: 100 }, Point { x: 662, y: 100 }]
        );
    }

    #[test]
    fn test_one_shape_per_node_one_edge_per_flow() {
        let graph = build_graph(&["Verify payment", "Send invoice"]);
        let diagram = layout(&graph);
        assert_eq!(diagram.shapes.len(), graph.nodes.len());
        assert_eq!(diagram.edges.len(), graph.flows.len());
        for (edge, flow) in diagram.edges.iter().zip(&graph.flows) {
            assert_eq!(edge.flow_id, flow.id);
        }
    }

    #[test]
    fn test_custom_pitch() {
        let engine = LayoutEngine {
            pitch: 100,
            ..LayoutEngine::default()
        };
        let diagram = engine.layout(&build_graph::<&str>(&[]));
        assert_eq!(diagram.shapes[1].bounds.x, 180 + 100 - 18);
    }
}
