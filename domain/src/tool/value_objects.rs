//! Tool domain value objects: result and error types
//!
//! Every dispatch produces a [`ToolResult`]. Failures are carried as data
//! (a [`ToolError`] inside the result) rather than as `Err`, so a failing
//! tool never aborts the conversation turn. The result is only flattened to
//! prose by [`ToolResult::to_prompt_text`] when it is handed back to the
//! model or shown to the user.

use serde::{Deserialize, Serialize};

/// Error that occurred during tool dispatch or execution.
///
/// | Code | Description |
/// |------|-------------|
/// | `TOOL_NOT_FOUND` | The model asked for a tool that is not registered |
/// | `INVALID_ARGUMENT` | A required argument is missing or unusable |
/// | `EXECUTION_FAILED` | The backing service rejected or failed the request |
/// | `PANICKED` | The tool handler panicked; caught at the dispatch boundary |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "TOOL_NOT_FOUND")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::new(
            "TOOL_NOT_FOUND",
            format!("Tool '{}' is not available", name.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self::new("PANICKED", message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == "TOOL_NOT_FOUND"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution, carrying output or error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed (as requested by the model)
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output content (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Canonical tool name when the model used an alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_name: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    /// Record the canonical name the call resolved to
    pub fn with_resolved_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.resolved_name = Some(name.into());
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the output content
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Flatten to the prose string the model (and the user) consumes.
    pub fn to_prompt_text(&self) -> String {
        match (&self.output, &self.error) {
            (Some(output), _) if self.success => output.clone(),
            (_, Some(error)) => match &error.details {
                Some(details) => format!("Error: {} ({})", error.message, details),
                None => format!("Error: {}", error.message),
            },
            _ => "Error: tool produced no output".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error() {
        let err = ToolError::tool_not_found("launch_rocket").with_details("not registered");

        assert_eq!(err.code, "TOOL_NOT_FOUND");
        assert!(err.is_not_found());
        assert!(err.message.contains("launch_rocket"));
        assert_eq!(
            err.to_string(),
            "[TOOL_NOT_FOUND] Tool 'launch_rocket' is not available (not registered)"
        );
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("check_schedule", "No events found for today.")
            .with_duration(12)
            .with_resolved_name("check_schedule");

        assert!(result.is_success());
        assert_eq!(result.output(), Some("No events found for today."));
        assert!(result.error().is_none());
        assert_eq!(result.metadata.duration_ms, Some(12));
        assert_eq!(result.to_prompt_text(), "No events found for today.");
    }

    #[test]
    fn test_tool_result_failure_flattens_to_error_text() {
        let result = ToolResult::failure(
            "send_notification",
            ToolError::execution_failed("SMTP connection refused"),
        );

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert_eq!(result.error().unwrap().code, "EXECUTION_FAILED");
        assert_eq!(result.to_prompt_text(), "Error: SMTP connection refused");
    }
}
