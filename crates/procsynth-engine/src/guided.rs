//! Questionnaire answers to a synthetic process description

use std::collections::BTreeMap;

/// Known questionnaire keys and their section labels, in output order
const SECTIONS: &[(&str, &str)] = &[
    ("process_name", "Process Name"),
    ("process_purpose", "Purpose"),
    ("process_trigger", "Trigger"),
    ("main_steps", "Main Steps"),
    ("decision_points", "Decision Points"),
    ("participants", "Participants"),
    ("systems_used", "Systems Used"),
    ("documents_data", "Documents/Data"),
    ("process_output", "Expected Output"),
    ("success_criteria", "Success Criteria"),
    // manufacturing
    ("production_type", "Production Type"),
    ("quality_checkpoints", "Quality Checkpoints"),
    ("equipment_dependencies", "Equipment Dependencies"),
    ("safety_requirements", "Safety Requirements"),
    // healthcare
    ("care_type", "Care Type"),
    ("patient_safety", "Patient Safety"),
    ("clinical_protocols", "Clinical Protocols"),
    ("healthcare_providers", "Healthcare Providers"),
    // finance
    ("financial_process_type", "Financial Process Type"),
    ("regulatory_requirements", "Regulatory Requirements"),
    ("approval_levels", "Approval Levels"),
    ("risk_factors", "Risk Factors"),
];

fn non_empty<'a>(answers: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    answers
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// Labelled sections for the known keys, joined by blank lines.
///
/// Unknown keys are ignored here; [`guided_description`] lists them.
#[must_use]
pub fn answers_to_description(answers: &BTreeMap<String, String>) -> String {
    SECTIONS
        .iter()
        .filter_map(|(key, label)| non_empty(answers, key).map(|v| format!("{label}: {v}")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The description a guided request feeds into the pipeline: the labelled
/// sections followed by every non-empty answer as a `key: value` line.
#[must_use]
pub fn guided_description(answers: &BTreeMap<String, String>) -> String {
    let mut description = answers_to_description(answers);
    description.push_str("\n\nAdditional Details:\n");
    for (key, value) in answers {
        if !value.trim().is_empty() {
            description.push_str(key);
            description.push_str(": ");
            description.push_str(value);
            description.push('\n');
        }
    }
    description
}
