//! Application layer for naomi
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestratorParams;
pub use ports::{
    adapter_error::AdapterError,
    calendar::CalendarPort,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    notification::{NoNotifier, NotificationOutcome, NotificationPort},
    progress::{NoTurnProgress, TurnProgressNotifier},
    spreadsheet::SpreadsheetPort,
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::respond::{RespondError, RespondInput, RespondOutput, RespondUseCase};
