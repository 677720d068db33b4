//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces provider-neutral
//! JSON Schema for native tool calling. Provider adapters reshape the
//! `input_schema` into their own declaration format.

use naomi_application::ports::tool_schema::ToolSchemaPort;
use naomi_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
///
/// Closed vocabularies become `enum`. Defaults are appended to the
/// description because not every provider accepts a `default` keyword.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            let description = match &param.default {
                Some(serde_json::Value::String(s)) if s.is_empty() => param.description.clone(),
                Some(serde_json::Value::String(s)) => {
                    format!("{} (default: {})", param.description, s)
                }
                Some(other) => format!("{} (default: {})", param.description, other),
                None => param.description.clone(),
            };

            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(schema_type));
            prop.insert("description".to_string(), serde_json::json!(description));
            if let Some(allowed) = &param.allowed_values {
                prop.insert("enum".to_string(), serde_json::json!(allowed));
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }

    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        let mut tools: Vec<&ToolDefinition> = spec.all().collect();
        tools.sort_by_key(|t| &t.name);
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
