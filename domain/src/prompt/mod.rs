//! Prompt domain
//!
//! Templates for the system instruction and per-turn messages.

mod template;

pub use template::AssistantPromptTemplate;
