//! Tool Registry
//!
//! The assistant's tool set is fixed at start-up: four schedule tools and
//! one notification tool, plus aliases for names models commonly invent.
//!
//! ```text
//! add_event, create_event     → add_to_schedule
//! list_events, get_schedule   → check_schedule
//! delete_event, remove_event  → remove_task
//! notify, send_email          → send_notification
//! ```

use super::{notify, schedule};
use naomi_domain::tool::entities::ToolSpec;

/// Alias → canonical tool name.
pub const TOOL_ALIASES: [(&str, &str); 8] = [
    ("add_event", schedule::ADD_TO_SCHEDULE),
    ("create_event", schedule::ADD_TO_SCHEDULE),
    ("list_events", schedule::CHECK_SCHEDULE),
    ("get_schedule", schedule::CHECK_SCHEDULE),
    ("delete_event", schedule::REMOVE_TASK),
    ("remove_event", schedule::REMOVE_TASK),
    ("notify", notify::SEND_NOTIFICATION),
    ("send_email", notify::SEND_NOTIFICATION),
];

/// Create the default tool specification with all available tools
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(schedule::add_to_schedule_definition())
        .register(schedule::check_schedule_definition())
        .register(schedule::remove_task_definition())
        .register(schedule::update_event_definition())
        .register(notify::send_notification_definition())
        .register_aliases(TOOL_ALIASES)
}
