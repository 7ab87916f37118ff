//! Document validation and assessment for procsynth
//!
//! Every document leaving the engine passes [`validate_strict`]; the
//! assessor and metadata extraction never fail.

mod complexity;
mod validator;

pub use complexity::{
    ElementCounts, LOW_MAX, MEDIUM_MAX, ProcessMetadata, assess_complexity, complexity_for_total,
    count_elements, extract_metadata,
};
pub use validator::{
    DEFINITIONS_CLOSE, DEFINITIONS_OPEN, REQUIRED_ELEMENTS, clean, validate, validate_strict,
};
