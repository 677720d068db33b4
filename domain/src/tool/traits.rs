//! Tool domain traits
//!
//! Contains pure domain logic for checking and normalising tool calls.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
///
/// Validation is forgiving: conversational input is noisy, so anything that
/// can be repaired with a declared default is repaired instead of rejected.
/// Only a missing required argument with no default is an error.
pub trait ToolValidator {
    /// Check a call against its definition and return the normalised call.
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<ToolCall, String>;
}

/// Default implementation of ToolValidator
///
/// - Missing optional arguments receive the declared default.
/// - Enum arguments outside the vocabulary fall back to the default.
/// - Arguments the definition does not declare are dropped.
/// - A missing required argument without a default is rejected.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<ToolCall, String> {
        let mut normalized = ToolCall::new(definition.name.clone());

        for param in &definition.parameters {
            let supplied = call
                .arguments
                .get(&param.name)
                .filter(|v| !v.is_null())
                .filter(|v| v.as_str().is_none_or(|s| !s.trim().is_empty()));

            let value = match supplied {
                Some(value) => match (value.as_str(), &param.allowed_values) {
                    (Some(s), Some(_)) if !param.accepts(s) => param.default.clone(),
                    (Some(s), Some(_)) => Some(serde_json::Value::String(s.trim().to_lowercase())),
                    (None, Some(_)) => param.default.clone(),
                    _ => Some(value.clone()),
                },
                None => param.default.clone(),
            };

            match value {
                Some(v) => {
                    normalized.arguments.insert(param.name.clone(), v);
                }
                None if param.required => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                None => {}
            }
        }

        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;

    fn schedule_definition() -> ToolDefinition {
        ToolDefinition::new("add_to_schedule", "Add an item")
            .with_parameter(ToolParameter::new("summary", "What", true))
            .with_parameter(ToolParameter::new("date", "When", false).with_default("today"))
            .with_parameter(
                ToolParameter::new("category", "Bucket", false)
                    .with_allowed_values(["work", "personal", "general"])
                    .with_default("general"),
            )
            .with_parameter(ToolParameter::new("time", "Clock time", false))
    }

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("add_to_schedule").with_arg("date", "tomorrow");

        let result = validator.validate(&call, &schedule_definition());
        assert!(result.unwrap_err().contains("Missing required parameter 'summary'"));
    }

    #[test]
    fn test_validator_blank_required_is_missing() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("add_to_schedule").with_arg("summary", "  ");

        assert!(validator.validate(&call, &schedule_definition()).is_err());
    }

    #[test]
    fn test_validator_fills_defaults() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("add_to_schedule").with_arg("summary", "Dentist");

        let normalized = validator.validate(&call, &schedule_definition()).unwrap();
        assert_eq!(normalized.get_string("date"), Some("today"));
        assert_eq!(normalized.get_string("category"), Some("general"));
        assert!(normalized.get_string("time").is_none());
    }

    #[test]
    fn test_validator_unknown_enum_degrades_to_default() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("add_to_schedule")
            .with_arg("summary", "Plant tomatoes")
            .with_arg("category", "gardening");

        let normalized = validator.validate(&call, &schedule_definition()).unwrap();
        assert_eq!(normalized.get_string("category"), Some("general"));
    }

    #[test]
    fn test_validator_normalises_enum_case_and_drops_unknown_params() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("add_to_schedule")
            .with_arg("summary", "Standup")
            .with_arg("category", " Work ")
            .with_arg("priority", "high");

        let normalized = validator.validate(&call, &schedule_definition()).unwrap();
        assert_eq!(normalized.get_string("category"), Some("work"));
        assert!(!normalized.arguments.contains_key("priority"));
    }

    #[test]
    fn test_validator_uses_canonical_name() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("create_event").with_arg("summary", "Standup");

        let normalized = validator.validate(&call, &schedule_definition()).unwrap();
        assert_eq!(normalized.tool_name, "add_to_schedule");
    }
}
