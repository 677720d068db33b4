//! Conversation history and model response types.

pub mod entities;
pub mod response;

pub use entities::{ConversationTurn, Role};
pub use response::{ContentBlock, LlmResponse, StopReason};
