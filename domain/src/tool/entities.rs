//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of a tool that the assistant can ask the orchestrator to run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "add_to_schedule")
    pub name: String,
    /// Human-readable description, shown to the model
    pub description: String,
    /// Parameter specifications, in declaration order
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint ("string", "number", "integer", "boolean")
    pub param_type: String,
    /// Value used when the argument is missing or out of vocabulary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Closed vocabulary for enum-like parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            default: None,
            allowed_values: None,
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `value` belongs to this parameter's vocabulary.
    ///
    /// Parameters without a vocabulary accept everything. Matching is
    /// case-insensitive.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.allowed_values {
            Some(allowed) => allowed.iter().any(|a| a.eq_ignore_ascii_case(value.trim())),
            None => true,
        }
    }
}

/// Specification of available tools
///
/// Fixed at start-up; there is no dynamic registration once the
/// orchestrator is running.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
    /// Alias → canonical name mapping (e.g. "create_event" → "add_to_schedule")
    aliases: HashMap<String, String>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    /// Register a single alias mapping (builder pattern)
    pub fn register_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    /// Register multiple aliases at once (builder pattern)
    pub fn register_aliases(
        mut self,
        mappings: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        for (alias, canonical) in mappings {
            self.aliases.insert(alias.into(), canonical.into());
        }
        self
    }

    /// Resolve an alias to its canonical name (aliases only, not canonical names)
    pub fn resolve_alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(|s| s.as_str())
    }

    /// Resolve a name: returns canonical name if it's a registered tool,
    /// or resolves alias, or None if unknown
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            Some(name)
        } else {
            self.resolve_alias(name)
                .filter(|canonical| self.tools.contains_key(*canonical))
        }
    }

    /// Get tool definition by canonical name or alias
    pub fn get_resolved(&self, name: &str) -> Option<&ToolDefinition> {
        self.resolve(name).and_then(|canonical| self.tools.get(canonical))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments, as proposed by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a string argument, treating blank strings as absent
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get_string(key).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_non_empty(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    /// Get an optional f64 argument (integers are widened)
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.arguments.get(key).and_then(|v| v.as_f64())
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }
}

/// Drop calls whose `key` matches an earlier call, keeping the first occurrence.
///
/// Models occasionally emit the same call twice in one response; executing
/// both would duplicate side effects such as calendar writes. Order of the
/// surviving calls is preserved.
///
/// Returns the surviving calls in their original form together with, for
/// every input call, the index of the survivor that stands in for it. Callers
/// pass a key that normalises the call (alias resolution, defaults, enum case)
/// so that spelling differences do not hide a duplicate.
pub fn dedup_tool_calls_by<K, F>(calls: &[ToolCall], key: F) -> (Vec<ToolCall>, Vec<usize>)
where
    K: PartialEq,
    F: Fn(&ToolCall) -> K,
{
    let mut keys: Vec<K> = Vec::with_capacity(calls.len());
    let mut unique = Vec::with_capacity(calls.len());
    let mut survivor_of = Vec::with_capacity(calls.len());
    for call in calls {
        let k = key(call);
        match keys.iter().position(|seen| *seen == k) {
            Some(index) => survivor_of.push(index),
            None => {
                survivor_of.push(unique.len());
                keys.push(k);
                unique.push(call.clone());
            }
        }
    }
    (unique, survivor_of)
}
