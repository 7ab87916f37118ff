//! Prompt templates for procsynth generators
//!
//! This crate provides the `PromptTemplate` enum, the fixed prompt text sent
//! to external generators, and single-pass variable rendering.
//!
//! Rendering substitutes `{name}` placeholders for the template's declared
//! variables only. Other brace groups (the JSON example in the optimization
//! prompt) pass through untouched, and placeholder text inside a substituted
//! value is never expanded again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while rendering a prompt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("prompt template '{template}' requires variable '{name}'")]
    MissingVariable {
        template: &'static str,
        name: &'static str,
    },

    #[error(
        "unknown prompt template '{0}'. Available templates: generation, optimization"
    )]
    UnknownTemplate(String),
}

/// Prompt templates known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptTemplate {
    /// Text description to BPMN XML
    ///
    /// Variables: `description`, `industry`
    Generation,
    /// Existing BPMN plus goals to a JSON optimization result
    ///
    /// Variables: `currentBpmn`, `industry`, `context`
    Optimization,
}

const GENERATION_BODY: &str = "You are a BPMN expert. Generate a comprehensive and detailed BPMN 2.0 XML diagram based on the process description.

IMPORTANT REQUIREMENTS:
1. Always start with a start event and end with an end event
2. Create multiple detailed tasks for each major step mentioned in the description
3. Include decision gateways where appropriate (exclusive, parallel, inclusive)
4. Add intermediate events where needed (message, timer, error events)
5. Use proper BPMN elements with meaningful names and IDs
6. Create realistic process flows with proper sequence flows
7. Include lanes/pools if multiple actors are involved
8. Add annotations or text annotations for clarity
9. Ensure the process has at least 5-10 activities for realistic complexity
10. Return only valid BPMN 2.0 XML, no explanations

Process Description: {description}
Industry Context: {industry}

Generate a detailed BPMN XML with multiple tasks, decision points, and proper flow logic:";

const GENERATION_SYSTEM: &str = "You are a BPMN expert that generates detailed, valid BPMN 2.0 XML diagrams with multiple tasks, decision points, and realistic process flows.";

const OPTIMIZATION_BODY: &str = r#"You are a process optimization expert. Analyze the current BPMN process and suggest improvements.

Current Process: {currentBpmn}
Industry: {industry}
Optimization Context: {context}

Provide:
1. Optimized BPMN XML
2. List of specific changes made
3. Brief summary of improvements

Format your response as JSON:
{
  "bpmnXml": "optimized BPMN XML here",
  "changes": ["change 1", "change 2", ...],
  "summary": "brief summary of improvements"
}"#;

const OPTIMIZATION_SYSTEM: &str =
    "You are a process optimization expert. Always respond with valid JSON.";

impl PromptTemplate {
    /// Parse a template name string into a PromptTemplate
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is not recognized.
    pub fn parse(s: &str) -> Result<Self, TemplateError> {
        match s.to_lowercase().as_str() {
            "generation" | "generate" => Ok(Self::Generation),
            "optimization" | "optimize" => Ok(Self::Optimization),
            _ => Err(TemplateError::UnknownTemplate(s.to_string())),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Optimization => "optimization",
        }
    }

    /// System message paired with this template
    #[must_use]
    pub const fn system_prompt(&self) -> &'static str {
        match self {
            Self::Generation => GENERATION_SYSTEM,
            Self::Optimization => OPTIMIZATION_SYSTEM,
        }
    }

    /// Variables that must be supplied to [`render`](Self::render)
    #[must_use]
    pub const fn required_variables(&self) -> &'static [&'static str] {
        match self {
            Self::Generation => &["description", "industry"],
            Self::Optimization => &["currentBpmn", "industry", "context"],
        }
    }

    #[must_use]
    pub const fn body(&self) -> &'static str {
        match self {
            Self::Generation => GENERATION_BODY,
            Self::Optimization => OPTIMIZATION_BODY,
        }
    }

    /// Render the user prompt in a single left-to-right pass.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] for the first required
    /// variable absent from `variables`.
    pub fn render(&self, variables: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        for &name in self.required_variables() {
            if !variables.contains_key(name) {
                return Err(TemplateError::MissingVariable {
                    template: self.as_str(),
                    name,
                });
            }
        }

        let body = self.body();
        let mut out = String::with_capacity(body.len());
        let mut rest = body;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let name = &after[..close];
                self.required_variables()
                    .contains(&name)
                    .then(|| (close, variables.get(name)))
            });

            match substituted {
                Some((close, Some(value))) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_valid_templates() {
        assert_eq!(
            PromptTemplate::parse("generation").unwrap(),
            PromptTemplate::Generation
        );
        assert_eq!(
            PromptTemplate::parse("Optimize").unwrap(),
            PromptTemplate::Optimization
        );
        assert!(matches!(
            PromptTemplate::parse("summarize"),
            Err(TemplateError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_generation_render_substitutes_both_variables() {
        let prompt = PromptTemplate::Generation
            .render(&vars(&[
                ("description", "Receive order then ship it"),
                ("industry", "manufacturing"),
            ]))
            .unwrap();
        assert!(prompt.contains("Process Description: Receive order then ship it\n"));
        assert!(prompt.contains("Industry Context: manufacturing\n"));
        assert!(!prompt.contains("{description}"));
    }

    #[test]
    fn test_optimization_render_keeps_json_example() {
        let prompt = PromptTemplate::Optimization
            .render(&vars(&[
                ("currentBpmn", "<bpmn:definitions/>"),
                ("industry", "finance"),
                ("context", r#"{"goal":"faster"}"#),
            ]))
            .unwrap();
        assert!(prompt.contains("Current Process: <bpmn:definitions/>"));
        assert!(prompt.contains(r#"Optimization Context: {"goal":"faster"}"#));
        assert!(prompt.contains(r#""bpmnXml": "optimized BPMN XML here""#));
        assert!(prompt.ends_with('}'));
    }

    #[test]
    fn test_render_is_single_pass() {
        let prompt = PromptTemplate::Generation
            .render(&vars(&[
                ("description", "mention {industry} literally"),
                ("industry", "healthcare"),
            ]))
            .unwrap();
        assert!(prompt.contains("Process Description: mention {industry} literally"));
        assert!(prompt.contains("Industry Context: healthcare"));
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let err = PromptTemplate::Optimization
            .render(&vars(&[("currentBpmn", "x"), ("industry", "general")]))
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingVariable {
                template: "optimization",
                name: "context"
            }
        );
    }

    #[test]
    fn test_system_prompts() {
        assert!(
            PromptTemplate::Generation
                .system_prompt()
                .starts_with("You are a BPMN expert")
        );
        assert!(
            PromptTemplate::Optimization
                .system_prompt()
                .ends_with("Always respond with valid JSON.")
        );
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&PromptTemplate::Optimization).unwrap();
        assert_eq!(json, r#""optimization""#);
    }
}
