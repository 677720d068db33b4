//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod adapter_error;
pub mod calendar;
pub mod conversation_logger;
pub mod llm_gateway;
pub mod notification;
pub mod progress;
pub mod spreadsheet;
pub mod tool_executor;
pub mod tool_schema;
