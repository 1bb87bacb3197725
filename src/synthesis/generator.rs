use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponseFormat, JsonSpec};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::error::SynthesisError;

/// Produces JSON conforming to a schema from a prompt.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, SynthesisError>;
}

/// Generator backed by a `genai` client; provider keys come from the usual env vars.
#[derive(Default)]
pub struct GenaiGenerator {
    client: Client,
}

impl GenaiGenerator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StructuredGenerator for GenaiGenerator {
    fn name(&self) -> &'static str {
        "genai"
    }

    #[instrument(skip(self, prompt, schema), fields(prompt_len = prompt.len()))]
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, SynthesisError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let options = ChatOptions::default().with_response_format(ChatResponseFormat::JsonSpec(
            JsonSpec::new(schema_name, schema.clone()),
        ));

        let response = self
            .client
            .exec_chat(model, request, Some(&options))
            .await
            .map_err(|e| SynthesisError::Provider {
                model: model.to_string(),
                reason: e.to_string(),
            })?;

        let text = response
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SynthesisError::EmptyResponse {
                model: model.to_string(),
            })?;

        debug!(response_len = text.len(), "LLM response received");
        parse_json_payload(text, schema_name)
    }
}

/// Parses a model reply, tolerating a surrounding markdown code fence.
pub fn parse_json_payload(text: &str, schema_name: &str) -> Result<Value, SynthesisError> {
    serde_json::from_str(strip_code_fence(text)).map_err(|source| SynthesisError::Parse {
        schema: schema_name.to_string(),
        source,
    })
}

pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Offline generator: answers every request with placeholder text shaped by the schema.
///
/// Used when no LLM provider is configured, and in tests.
#[derive(Debug, Default)]
pub struct StubGenerator {
    fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose every call fails with [`SynthesisError::Provider`].
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl StructuredGenerator for StubGenerator {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if self.fail {
            return Err(SynthesisError::Provider {
                model: model.to_string(),
                reason: "stub generator configured to fail".to_string(),
            });
        }

        Ok(fill_schema(schema, schema_name))
    }
}

fn fill_schema(schema: &Value, path: &str) -> Value {
    match schema.get("type").and_then(Value::as_str) {
        Some("object") => {
            let mut out = Map::new();
            if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                for (name, prop) in props {
                    out.insert(name.clone(), fill_schema(prop, &format!("{}.{}", path, name)));
                }
            }
            Value::Object(out)
        }
        Some("array") => Value::Array(Vec::new()),
        Some("boolean") => Value::Bool(false),
        Some("integer") | Some("number") => Value::from(0),
        _ => Value::String(format!("stub {}", path)),
    }
}
