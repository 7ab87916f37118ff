//! Generation engine for procsynth
//!
//! [`Orchestrator`] turns requests into validated BPMN documents. It tries the
//! configured external generators first and falls back to the local
//! [`DeterministicPipeline`], which cannot fail. Every returned document has
//! passed strict validation and carries derived [`ProcessMetadata`].
//!
//! ```no_run
//! use procsynth_config::Config;
//! use procsynth_engine::{GenerationRequest, Orchestrator};
//! use procsynth_utils::types::Industry;
//!
//! # async fn run() -> Result<(), procsynth_utils::SynthError> {
//! let orchestrator = Orchestrator::from_config(&Config::defaults());
//! let request = GenerationRequest::new(
//!     "We verify payment, then ship the product.",
//!     "Orders",
//!     Industry::General,
//! );
//! let outcome = orchestrator.generate(&request).await?;
//! println!("{}", outcome.document.xml);
//! # Ok(())
//! # }
//! ```

mod guided;
mod history;
mod orchestrator;
mod pipeline;
mod report;
mod request;
mod response;

pub use guided::{answers_to_description, guided_description};
pub use history::{OptimizationHistory, OptimizationRecord, ProcessDocument};
pub use orchestrator::{
    GENERATION_MAX_TOKENS, GenerationOutcome, OPTIMIZATION_MAX_TOKENS, OptimizationOutcome,
    Orchestrator, RetryPolicy, goals_from_pairs,
};
pub use pipeline::DeterministicPipeline;
pub use procsynth_validation::ProcessMetadata;
pub use report::{GenerationReport, GenerationSource, StageFailure, State};
pub use request::{
    DESCRIPTION_MAX_CHARS, DESCRIPTION_MIN_CHARS, GenerationRequest, GuidedRequest,
    OptimizeRequest, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
pub use response::{
    NO_OP_CHANGES, NO_OP_SUMMARY, OptimizationResponse, extract_xml_block,
    parse_optimization_response,
};
