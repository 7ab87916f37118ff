//! Local extraction, graph, layout and serialization

use std::sync::Arc;
use tracing::debug;

use procsynth_extraction::{TaskExtractor, default_extractor};
use procsynth_graph::{LayoutEngine, build_graph};

/// The always-available pipeline used when no external generator answers.
///
/// Every stage is infallible, so [`synthesize`](Self::synthesize) always
/// returns a document.
#[derive(Debug, Clone)]
pub struct DeterministicPipeline {
    extractor: Arc<TaskExtractor>,
    layout: LayoutEngine,
}

impl Default for DeterministicPipeline {
    fn default() -> Self {
        Self {
            extractor: Arc::new(default_extractor().clone()),
            layout: LayoutEngine::default(),
        }
    }
}

impl DeterministicPipeline {
    /// Use a custom extraction vocabulary.
    #[must_use]
    pub fn with_extractor(extractor: TaskExtractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutEngine) -> Self {
        self.layout = layout;
        self
    }

    /// Build a BPMN document named `process_name` from `description`.
    #[must_use]
    pub fn synthesize(&self, description: &str, process_name: &str) -> String {
        let tasks = self.extractor.extract(description);
        debug!(
            tasks = tasks.len(),
            first = tasks.first().map(|t| t.as_str()).unwrap_or_default(),
            "Extracted tasks"
        );
        let graph = build_graph(&tasks);
        let layout = self.layout.layout(&graph);
        procsynth_bpmn::serialize(&graph, &layout, process_name)
    }
}
