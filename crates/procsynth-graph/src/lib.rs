//! Process graph construction and layout for procsynth
//!
//! [`build_graph`] expands an ordered task list into a start-to-end path of
//! typed nodes; [`LayoutEngine`] assigns draft diagram geometry to it.

mod builder;
mod layout;
mod model;

pub use builder::build_graph;
pub use layout::{
    Bounds, COLUMN_PITCH, DiagramLayout, EdgeGeometry, LANE_Y, LayoutEngine, ORIGIN_X, Point,
    ShapeGeometry, layout, shape_size,
};
pub use model::{NodeKind, ProcessGraph, ProcessNode, SequenceFlow};
