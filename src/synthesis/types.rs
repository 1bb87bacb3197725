use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::{StructuredOutput, object_schema, string_schema};

/// Category-by-category analysis of a code diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSummary {
    pub code_functionality_and_business_logic: String,
    pub code_structure_and_modularity: String,
    pub performance_and_scalability: String,
    pub variables_data_types_and_data_integrity: String,
    pub error_handling_and_user_impact: String,
    pub code_efficiency_for_product_use_cases: String,
    pub readability_maintainability_and_collaboration: String,
    pub testing_validation_and_product_requirements: String,
    pub external_dependencies_and_integration: String,
    pub security_considerations_in_context_of_product_use: String,
    pub compliance_and_regulatory_requirements: String,
    pub code_standards_and_best_practices: String,
}

impl StructuredOutput for CodeSummary {
    const NAME: &'static str = "code_summary";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        (
            "code_functionality_and_business_logic",
            "Core business functionality and impact on the product.",
        ),
        (
            "code_structure_and_modularity",
            "Code organization, modularity, and design patterns.",
        ),
        (
            "performance_and_scalability",
            "Performance analysis, scalability, and bottleneck identification.",
        ),
        (
            "variables_data_types_and_data_integrity",
            "Data handling, validation, and integrity mechanisms.",
        ),
        (
            "error_handling_and_user_impact",
            "Error handling and its impact on user experience.",
        ),
        (
            "code_efficiency_for_product_use_cases",
            "Optimization opportunities in product use cases.",
        ),
        (
            "readability_maintainability_and_collaboration",
            "Code readability, maintainability, and collaboration ease.",
        ),
        (
            "testing_validation_and_product_requirements",
            "Testing coverage and alignment with product needs.",
        ),
        (
            "external_dependencies_and_integration",
            "External dependencies and integration within the tech stack.",
        ),
        (
            "security_considerations_in_context_of_product_use",
            "Security risks and compliance with security best practices.",
        ),
        (
            "compliance_and_regulatory_requirements",
            "Compliance with relevant regulations and legal requirements.",
        ),
        (
            "code_standards_and_best_practices",
            "Adherence to coding standards and best practices.",
        ),
    ];
}

/// Category-by-category summary of a product requirements document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsSummary {
    pub core_business_functionality: String,
    pub structural_and_modular_requirements: String,
    pub performance_and_scalability_criteria: String,
    pub data_handling_and_integrity: String,
    pub error_handling_and_user_experience: String,
    pub efficiency_requirements_for_product_use_cases: String,
    pub readability_maintainability_and_team_adoption: String,
    pub testing_and_validation_criteria: String,
    pub external_dependencies_and_integrations: String,
    pub security_standards_and_threat_mitigation: String,
    pub compliance_and_regulatory_considerations: String,
    pub adherence_to_standards_and_best_practices: String,
}

const REQUIREMENT_FIELDS: &[(&str, &str)] = &[
    (
        "core_business_functionality",
        "Core business needs and the value the product must deliver.",
    ),
    (
        "structural_and_modular_requirements",
        "Architectural and modular expectations for long-term maintainability.",
    ),
    (
        "performance_and_scalability_criteria",
        "Performance benchmarks and expected scalability.",
    ),
    (
        "data_handling_and_integrity",
        "Data validation, integrity, and compliance needs.",
    ),
    (
        "error_handling_and_user_experience",
        "Expected error handling behaviour and user impact mitigation.",
    ),
    (
        "efficiency_requirements_for_product_use_cases",
        "Efficiency benchmarks specific to product operations.",
    ),
    (
        "readability_maintainability_and_team_adoption",
        "Maintainability practices and cross-team usability.",
    ),
    (
        "testing_and_validation_criteria",
        "Testing standards and validation requirements.",
    ),
    (
        "external_dependencies_and_integrations",
        "Dependencies and expected integrations with other services.",
    ),
    (
        "security_standards_and_threat_mitigation",
        "Security expectations and risk mitigation measures.",
    ),
    (
        "compliance_and_regulatory_considerations",
        "Regulatory constraints and compliance measures (e.g. GDPR, HIPAA).",
    ),
    (
        "adherence_to_standards_and_best_practices",
        "Alignment with industry standards and best practices.",
    ),
];

impl StructuredOutput for RequirementsSummary {
    const NAME: &'static str = "requirements_summary";
    const FIELDS: &'static [(&'static str, &'static str)] = REQUIREMENT_FIELDS;
}

/// Verdict for one requirement category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonCategory {
    pub did_right: String,
    pub did_wrong: String,
    pub ambiguous: String,
}

impl ComparisonCategory {
    pub const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("did_right", "Aspects where the code meets the requirement."),
        ("did_wrong", "Aspects where the code fails to meet the requirement."),
        (
            "ambiguous",
            "Aspects where it is unclear whether the requirement is met.",
        ),
    ];
}

/// Code-versus-requirements verdicts, keyed like [`RequirementsSummary`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub core_business_functionality: ComparisonCategory,
    pub structural_and_modular_requirements: ComparisonCategory,
    pub performance_and_scalability_criteria: ComparisonCategory,
    pub data_handling_and_integrity: ComparisonCategory,
    pub error_handling_and_user_experience: ComparisonCategory,
    pub efficiency_requirements_for_product_use_cases: ComparisonCategory,
    pub readability_maintainability_and_team_adoption: ComparisonCategory,
    pub testing_and_validation_criteria: ComparisonCategory,
    pub external_dependencies_and_integrations: ComparisonCategory,
    pub security_standards_and_threat_mitigation: ComparisonCategory,
    pub compliance_and_regulatory_considerations: ComparisonCategory,
    pub adherence_to_standards_and_best_practices: ComparisonCategory,
}

impl StructuredOutput for ComparisonSummary {
    const NAME: &'static str = "comparison_summary";
    const FIELDS: &'static [(&'static str, &'static str)] = REQUIREMENT_FIELDS;

    fn property_schema(description: &str) -> Value {
        let mut schema = object_schema(
            ComparisonCategory::FIELDS
                .iter()
                .map(|(name, desc)| (*name, string_schema(desc))),
        );
        schema["description"] = Value::String(description.to_string());
        schema
    }
}
