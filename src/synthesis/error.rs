use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    #[error("LLM provider error (model {model}): {reason}")]
    Provider { model: String, reason: String },

    #[error("LLM returned no content (model {model})")]
    EmptyResponse { model: String },

    #[error("failed to parse {schema} response: {source}")]
    Parse {
        schema: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type SynthesisResult<T> = Result<T, SynthesisError>;
