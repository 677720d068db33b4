//! Tool Executor port
//!
//! Defines the interface for executing tools (calendar, sheet and
//! notification actions).

use async_trait::async_trait;
use naomi_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
///
/// `execute` never fails: unknown tools, bad arguments and adapter errors
/// all come back as a failed [`ToolResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available, following aliases
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get_resolved(name).is_some()
    }

    /// Get the definition of a specific tool, following aliases
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get_resolved(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// The call as it would be executed: canonical name, defaults filled,
    /// enum values lowercased, undeclared arguments dropped.
    ///
    /// Unknown tools and calls that fail validation are returned unchanged.
    fn normalize(&self, call: &ToolCall) -> ToolCall {
        self.get_tool(&call.tool_name)
            .and_then(|definition| DefaultToolValidator.validate(call, definition).ok())
            .unwrap_or_else(|| call.clone())
    }

    /// Execute a tool call asynchronously
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
