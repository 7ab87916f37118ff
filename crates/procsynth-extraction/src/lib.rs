//! Deterministic task extraction for procsynth
//!
//! Turns a free-text process description into an ordered list of short task
//! phrases using a substitutable vocabulary ([`ExtractionRules`]). Extraction
//! is lexical only and never fails.

mod extractor;
mod rules;

pub use extractor::{
    ExtractedTask, ExtractionError, TaskExtractor, default_extractor, extract_tasks,
};
pub use rules::{DEFAULT_MAX_TASKS, ExtractionRules, KeywordDefault, MAX_PHRASE_CHARS};
