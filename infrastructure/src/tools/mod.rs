//! Tool implementations for the assistant
//!
//! This module provides the concrete tools the model can call and the
//! executor that dispatches them:
//!
//! - `schedule`: add_to_schedule, check_schedule, remove_task, update_event
//! - `notify`: send_notification
//! - `registry`: the fixed tool set and its aliases

pub mod notify;
pub mod schedule;

mod executor;
mod registry;
mod schema;

pub use executor::ScheduleToolExecutor;
pub use registry::{TOOL_ALIASES, default_tool_spec};
pub use schema::JsonSchemaToolConverter;

use naomi_application::ports::{
    calendar::CalendarPort, notification::NotificationPort, spreadsheet::SpreadsheetPort,
};
use naomi_domain::TimeResolver;
use std::sync::Arc;

/// Backing services shared by every tool handler.
///
/// Built once at start-up and injected into the executor.
#[derive(Clone)]
pub struct ScheduleServices {
    pub calendar: Arc<dyn CalendarPort>,
    pub sheet: Arc<dyn SpreadsheetPort>,
    pub notifier: Arc<dyn NotificationPort>,
    pub resolver: TimeResolver,
}
