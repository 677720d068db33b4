//! Infrastructure layer for naomi
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Gemini gateway, Google Calendar and Sheets
//! REST clients, the SMTP notifier, in-memory stand-ins for offline use, the
//! schedule tool executor and configuration file loading.

pub mod calendar;
pub mod config;
pub mod email;
pub mod gemini;
pub mod google;
pub mod logging;
pub mod sheets;
pub mod tools;

// Re-export commonly used types
pub use calendar::{GoogleCalendar, InMemoryCalendar};
pub use config::{CalendarBackend, ConfigError, ConfigLoader, FileConfig};
pub use email::{SmtpNotifier, SmtpSettings};
pub use gemini::{GeminiGateway, GeminiSession};
pub use google::GoogleApiClient;
pub use logging::JsonlConversationLogger;
pub use sheets::{GoogleSheet, InMemorySheet};
pub use tools::{
    JsonSchemaToolConverter, ScheduleServices, ScheduleToolExecutor, TOOL_ALIASES,
    default_tool_spec,
};
