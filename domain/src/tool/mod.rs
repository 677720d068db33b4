//! Tool domain module
//!
//! Defines the abstractions behind the assistant's **tool calling**: the
//! model proposes actions, the orchestrator decides to run them.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (output)     │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "create_event" → "add_to_schedule"
//!        └─ tools:   "add_to_schedule" → ToolDefinition
//! ```
//!
//! # Key Types
//!
//! - [`ToolSpec`]: Registry of available tools + alias mappings
//! - [`ToolDefinition`]: Schema for a single tool (name, ordered parameters)
//! - [`ToolCall`]: An invocation request with arguments
//! - [`ToolResult`]: Execution outcome; failures are data, not errors
//! - [`ToolValidator`]: Argument normalisation (defaults, enum fallback)
//!
//! Models sometimes repeat a call within one response;
//! [`dedup_tool_calls_by`] removes repeats before anything is executed,
//! comparing calls after alias resolution and argument normalisation.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{
    ToolCall, ToolDefinition, ToolParameter, ToolSpec, dedup_tool_calls_by,
};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
