//! External generator abstraction for procsynth
//!
//! HTTP providers implement the `GeneratorBackend` trait, so the orchestrator
//! can sequence primary, secondary and scripted generators without knowing
//! implementation details.

mod factory;
mod http_client;
mod huggingface_backend;
mod openai_backend;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use factory::{GeneratorSet, construct_backend_for_provider, generators_from_config};
pub use procsynth_utils::error::GeneratorError;
pub use types::{Completion, CompletionRequest, GeneratorBackend, Message, Role};

// Test seam; not part of public API stability guarantees.
#[doc(hidden)]
pub use http_client::redact_error_message_for_testing;
