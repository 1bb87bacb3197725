//! Structured LLM summaries of code diffs and requirements, and their comparison.

pub mod error;
pub mod generator;
pub mod prompt;
pub mod schema;
pub mod service;
pub mod types;


pub use error::{SynthesisError, SynthesisResult};
pub use generator::{
    GenaiGenerator, StructuredGenerator, StubGenerator, parse_json_payload, strip_code_fence,
};
pub use schema::StructuredOutput;
pub use service::Synthesizer;
pub use types::{CodeSummary, ComparisonCategory, ComparisonSummary, RequirementsSummary};
