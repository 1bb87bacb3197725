use super::schema::StructuredOutput;
use super::types::{CodeSummary, ComparisonSummary, RequirementsSummary};

fn category_list(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, description)| format!("- {}: {}", name, description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn code_summary_prompt(diffs: &str) -> String {
    format!(
        "Analyze the provided code diff and return a structured JSON summary with one entry \
         per category:\n\n{}\n\nHere is the code diff:\n{}\n",
        category_list(CodeSummary::FIELDS),
        diffs
    )
}

pub fn requirements_summary_prompt(requirements: &str) -> String {
    format!(
        "Analyze the following product requirements document and return a structured JSON \
         output summarizing the key expectations in each category:\n\n{}\n\n\
         Here is the product requirements document:\n{}\n",
        category_list(RequirementsSummary::FIELDS),
        requirements
    )
}

/// Both summaries are embedded as JSON so the model sees the same keys it must answer with.
pub fn comparison_prompt(code_json: &str, requirements_json: &str) -> String {
    format!(
        "Given the following product requirements and the corresponding code implementation \
         summary, analyze each category and classify the findings into:\n\n\
         - did_right: aspects where the code meets or exceeds the requirement.\n\
         - did_wrong: aspects where the code fails to meet the requirement.\n\
         - ambiguous: areas where it is unclear whether the code meets the requirement.\n\n\
         Categories:\n{}\n\nRespond in structured JSON.\n\n\
         Product requirements:\n{}\n\nCode implementation:\n{}\n",
        category_list(ComparisonSummary::FIELDS),
        requirements_json,
        code_json
    )
}
