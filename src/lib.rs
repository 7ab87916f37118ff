//! procsynth - Turn plain-language process descriptions into BPMN 2.0 diagrams
//!
//! procsynth accepts a free-text description (or a guided questionnaire) and
//! returns a BPMN 2.0 XML document with diagram layout. External text
//! generators are tried first; when none answers, a local deterministic
//! pipeline extracts tasks, builds a linear flow, lays it out and serializes
//! it. Every returned document passes validation.
//!
//! procsynth can be used in two ways:
//! - **CLI**: run the `procsynth` binary
//! - **Library**: depend on this crate and drive [`Orchestrator`] directly
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Generate from an inline description
//! procsynth generate --title "Order Fulfilment" \
//!     --description "We receive the order, verify payment, then ship the product."
//!
//! # Check an existing document
//! procsynth validate process.bpmn
//!
//! # Show counts and complexity
//! procsynth assess process.bpmn
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use procsynth::{Config, GenerationRequest, Industry, Orchestrator};
//!
//! # async fn demo() -> Result<(), procsynth::SynthError> {
//! let orchestrator = Orchestrator::from_config(&Config::defaults());
//! let request = GenerationRequest::new(
//!     "We receive the order, verify payment, then ship the product.",
//!     "Order Fulfilment",
//!     Industry::General,
//! );
//! let outcome = orchestrator.generate(&request).await?;
//! println!("{}", outcome.document.xml);
//! # Ok(())
//! # }
//! ```
//!
//! The deterministic building blocks are also usable on their own:
//!
//! ```rust
//! use procsynth::{build_graph, extract_tasks, layout, serialize, validate_strict};
//!
//! let tasks = extract_tasks("Collect samples, then approve results.");
//! let graph = build_graph(&tasks);
//! let xml = serialize(&graph, &layout(&graph), "Lab Intake");
//! assert!(validate_strict(&xml).is_ok());
//! ```
//!
//! # Stable Public API
//!
//! The re-exports below are stable for 1.x releases. Member crates are
//! implementation details and may change between minor versions.
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Internal failure |
//! | 2 | Invalid arguments, input, or configuration |
//! | 3 | Document failed validation |
//! | 4 | Provider quota exhausted |

pub mod cli;

// Errors, exit codes, shared types
pub use procsynth_utils::{
    ConfigError, ExitCode, GeneratorError, InputError, SynthError, UserFriendlyError,
    ValidationError,
    types::{Complexity, Industry},
};

// Configuration
pub use procsynth_config::{CliArgs, Config, ConfigBuilder};

// External generators
pub use procsynth_llm::{GeneratorBackend, GeneratorSet};

// Deterministic pipeline stages
pub use procsynth_bpmn::serialize;
pub use procsynth_extraction::{ExtractedTask, ExtractionRules, TaskExtractor, extract_tasks};
pub use procsynth_graph::{DiagramLayout, LayoutEngine, ProcessGraph, build_graph, layout};
pub use procsynth_validation::{
    ProcessMetadata, assess_complexity, clean, extract_metadata, validate, validate_strict,
};

// Orchestration
pub use procsynth_engine::{
    DeterministicPipeline, GenerationOutcome, GenerationReport, GenerationRequest,
    GenerationSource, GuidedRequest, OptimizationHistory, OptimizationOutcome,
    OptimizationRecord, OptimizeRequest, Orchestrator, ProcessDocument, RetryPolicy,
};
