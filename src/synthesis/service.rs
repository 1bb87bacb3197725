use std::sync::Arc;

use tracing::{info, instrument};

use super::error::{SynthesisError, SynthesisResult};
use super::generator::StructuredGenerator;
use super::prompt::{code_summary_prompt, comparison_prompt, requirements_summary_prompt};
use super::schema::StructuredOutput;
use super::types::{CodeSummary, ComparisonSummary, RequirementsSummary};

/// Summarizes code and requirements with an LLM and compares the two.
pub struct Synthesizer {
    generator: Arc<dyn StructuredGenerator>,
    code_model: String,
    synthesis_model: String,
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("generator", &self.generator.name())
            .field("code_model", &self.code_model)
            .field("synthesis_model", &self.synthesis_model)
            .finish()
    }
}

impl Synthesizer {
    /// `code_model` handles diffs; `synthesis_model` handles requirements and comparisons.
    pub fn new(
        generator: Arc<dyn StructuredGenerator>,
        code_model: impl Into<String>,
        synthesis_model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            code_model: code_model.into(),
            synthesis_model: synthesis_model.into(),
        }
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    #[instrument(skip(self, diffs), fields(diff_len = diffs.len()))]
    pub async fn summarize_code(&self, diffs: &str) -> SynthesisResult<CodeSummary> {
        require_non_empty(diffs, "diffs")?;
        self.run(&self.code_model, &code_summary_prompt(diffs)).await
    }

    #[instrument(skip(self, requirements), fields(requirements_len = requirements.len()))]
    pub async fn summarize_requirements(
        &self,
        requirements: &str,
    ) -> SynthesisResult<RequirementsSummary> {
        require_non_empty(requirements, "requirements")?;
        self.run(&self.synthesis_model, &requirements_summary_prompt(requirements))
            .await
    }

    #[instrument(skip_all)]
    pub async fn compare(
        &self,
        code: &CodeSummary,
        requirements: &RequirementsSummary,
    ) -> SynthesisResult<ComparisonSummary> {
        let code_json = to_prompt_json(code)?;
        let requirements_json = to_prompt_json(requirements)?;
        self.run(
            &self.synthesis_model,
            &comparison_prompt(&code_json, &requirements_json),
        )
        .await
    }

    /// Summarizes `diffs` and `requirements` concurrently, then compares the summaries.
    pub async fn synthesize(
        &self,
        diffs: &str,
        requirements: &str,
    ) -> SynthesisResult<ComparisonSummary> {
        let (code, reqs) = tokio::try_join!(
            self.summarize_code(diffs),
            self.summarize_requirements(requirements)
        )?;
        self.compare(&code, &reqs).await
    }

    async fn run<T: StructuredOutput>(&self, model: &str, prompt: &str) -> SynthesisResult<T> {
        let value = self
            .generator
            .generate(model, prompt, T::NAME, &T::json_schema())
            .await?;

        let parsed = serde_json::from_value(value).map_err(|source| SynthesisError::Parse {
            schema: T::NAME.to_string(),
            source,
        })?;
        info!(schema = T::NAME, model, "Structured output generated");
        Ok(parsed)
    }
}

fn require_non_empty(text: &str, field: &'static str) -> SynthesisResult<()> {
    if text.trim().is_empty() {
        return Err(SynthesisError::EmptyInput { field });
    }
    Ok(())
}

fn to_prompt_json<T: StructuredOutput>(value: &T) -> SynthesisResult<String> {
    serde_json::to_string_pretty(value).map_err(|source| SynthesisError::Parse {
        schema: T::NAME.to_string(),
        source,
    })
}
