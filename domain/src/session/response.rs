//! LLM response types for native tool calling.
//!
//! A provider response is a list of content blocks mixing text and tool use
//! requests. The orchestrator inspects the blocks itself; nothing is ever
//! executed on the provider side.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single block of content within an LLM response.
///
/// # Examples
///
/// ```
/// use naomi_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::Text("Let me check your calendar.".to_string());
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     name: "check_schedule".to_string(),
///     input: [("date".to_string(), serde_json::json!("tomorrow"))]
///         .into_iter().collect(),
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text(String),

    /// A tool use request from the model.
    ToolUse {
        /// Tool name as emitted by the model; may be an alias or unknown.
        name: String,
        /// Arguments as emitted by the model.
        input: HashMap<String, serde_json::Value>,
    },
}

impl ContentBlock {
    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `(name, input)` if this is a `ToolUse` block.
    pub fn as_tool_use(&self) -> Option<(&str, &HashMap<String, serde_json::Value>)> {
        match self {
            ContentBlock::ToolUse { name, input } => Some((name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// The model wants tools to run.
    ToolUse,
    /// Hit the token limit; the response may be truncated.
    MaxTokens,
    /// Blocked by the provider's safety filter.
    Safety,
    /// Provider-specific stop reason.
    Other(String),
}

/// A structured response from an LLM, supporting both text and tool use.
///
/// # Examples
///
/// ```
/// use naomi_domain::session::response::LlmResponse;
///
/// let response = LlmResponse::from_text("Hello!");
/// assert_eq!(response.text_content(), "Hello!");
/// assert!(!response.has_tool_calls());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: Option<StopReason>,
    /// Model identifier (if returned by the API).
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all `ToolUse` content blocks as `Vec<ToolCall>`, in order.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { name, input } => Some(ToolCall {
                    tool_name: name.clone(),
                    arguments: input.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if the response contains any tool use requests.
    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}
