//! Domain layer for naomi
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Turn
//!
//! One user message produces one turn. A turn is split into a *thinking*
//! phase (the model decides what to do, retryable) and an *acting* phase
//! (tools run, never retried). See [`orchestration::TurnState`].
//!
//! ## Tools
//!
//! The model proposes [`ToolCall`]s against a fixed [`ToolSpec`]; results
//! come back as [`ToolResult`]s and are flattened to prose for the model.
//!
//! ## Time
//!
//! [`TimeResolver`] anchors "today", "tomorrow" and fuzzy clock times to a
//! single configured timezone.

pub mod config;
pub mod core;
pub mod credential;
pub mod orchestration;
pub mod prompt;
pub mod schedule;
pub mod session;
pub mod time;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::error::DomainError;
pub use credential::CredentialPool;
pub use orchestration::{ControlWord, TurnPhase, TurnState};
pub use prompt::AssistantPromptTemplate;
pub use schedule::{
    CalendarEvent, Category, EventChanges, EventDraft, ItemType, ScheduleItem,
};
pub use session::{
    entities::{ConversationTurn, Role},
    response::{ContentBlock, LlmResponse, StopReason},
};
pub use time::{
    Clock, DEFAULT_TIMEZONE, FixedClock, SystemClock, TimeParseError, TimeRange, TimeResolver,
};
pub use tool::{
    entities::{
        ToolCall, ToolDefinition, ToolParameter, ToolSpec, dedup_tool_calls_by,
    },
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
