//! BPMN serialization for procsynth
//!
//! Documents are assembled as an [`Element`] tree and rendered in one pass.
//! [`escape_xml`] is the only route user text takes into the output.

mod element;
mod serializer;

pub use element::{Element, escape_xml};
pub use serializer::{
    BPMN_DI_NS, BPMN_MODEL_NS, DD_DC_NS, DD_DI_NS, DEFINITIONS_ID, DIAGRAM_ID, PLANE_ID,
    PROCESS_ID, TARGET_NS, serialize,
};
