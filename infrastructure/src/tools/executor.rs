//! Schedule tool executor, the concrete [`ToolExecutorPort`].
//!
//! [`ScheduleToolExecutor`] is the dispatcher: it bridges the application
//! layer's abstract [`ToolExecutorPort`] with the calendar, spreadsheet and
//! notification adapters.
//!
//! # Execution Path
//!
//! ```text
//! ToolExecutorPort::execute()
//!   ├─ resolve name (aliases)      → TOOL_NOT_FOUND on miss
//!   ├─ validate / normalise args   → INVALID_ARGUMENT on missing required
//!   ├─ handler (inside catch_unwind)
//!   │    ├─ Ok(text)               → success
//!   │    ├─ Err(ToolError)         → failure
//!   │    └─ panic                  → PANICKED failure
//!   └─ attach duration + resolved name
//! ```
//!
//! Nothing here returns `Err` or lets a panic escape: every outcome is a
//! [`ToolResult`].

use super::{ScheduleServices, default_tool_spec, notify, schedule};
use async_trait::async_trait;
use futures::FutureExt;
use naomi_application::ports::tool_executor::ToolExecutorPort;
use naomi_domain::tool::{
    entities::{ToolCall, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, warn};

/// Executor that runs the assistant's tools against the configured services.
pub struct ScheduleToolExecutor {
    /// Available tools
    tool_spec: ToolSpec,
    services: ScheduleServices,
    validator: DefaultToolValidator,
}

impl ScheduleToolExecutor {
    /// Create an executor with the default tool set.
    pub fn new(services: ScheduleServices) -> Self {
        Self::with_tools(default_tool_spec(), services)
    }

    /// Create an executor with a custom tool spec
    pub fn with_tools(tool_spec: ToolSpec, services: ScheduleServices) -> Self {
        Self {
            tool_spec,
            services,
            validator: DefaultToolValidator,
        }
    }

    pub fn services(&self) -> &ScheduleServices {
        &self.services
    }

    /// Route a validated call by canonical name.
    async fn dispatch(&self, call: &ToolCall) -> Result<String, ToolError> {
        let services = &self.services;
        match call.tool_name.as_str() {
            schedule::ADD_TO_SCHEDULE => schedule::execute_add_to_schedule(services, call).await,
            schedule::CHECK_SCHEDULE => schedule::execute_check_schedule(services, call).await,
            schedule::REMOVE_TASK => schedule::execute_remove_task(services, call).await,
            schedule::UPDATE_EVENT => schedule::execute_update_event(services, call).await,
            notify::SEND_NOTIFICATION => notify::execute_send_notification(services, call).await,
            other => Err(ToolError::execution_failed(format!(
                "Tool '{}' is not implemented",
                other
            ))),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for ScheduleToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let Some(definition) = self.tool_spec.get_resolved(&call.tool_name) else {
            warn!(tool = %call.tool_name, "Model requested an unknown tool");
            return ToolResult::failure(&call.tool_name, ToolError::tool_not_found(&call.tool_name));
        };
        let canonical = definition.name.clone();
        if canonical != call.tool_name {
            debug!(alias = %call.tool_name, tool = %canonical, "Resolved tool alias");
        }

        let normalized = match self.validator.validate(call, definition) {
            Ok(normalized) => normalized,
            Err(e) => {
                return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(e))
                    .with_resolved_name(canonical);
            }
        };

        let outcome = AssertUnwindSafe(self.dispatch(&normalized))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(text)) => ToolResult::success(&call.tool_name, text),
            Ok(Err(error)) => {
                warn!(tool = %canonical, error = %error, "Tool failed");
                ToolResult::failure(&call.tool_name, error)
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(tool = %canonical, panic = %message, "Tool panicked");
                ToolResult::failure(
                    &call.tool_name,
                    ToolError::panicked(format!("Tool '{}' crashed: {}", canonical, message)),
                )
            }
        };

        result
            .with_duration(start.elapsed().as_millis() as u64)
            .with_resolved_name(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::InMemoryCalendar;
    use crate::sheets::InMemorySheet;
    use async_trait::async_trait;
    use chrono::{TimeZone, Timelike};
    use naomi_application::ports::adapter_error::AdapterError;
    use naomi_application::ports::notification::{NoNotifier, NotificationOutcome, NotificationPort};
    use naomi_application::ports::spreadsheet::SpreadsheetPort;
    use naomi_domain::{FixedClock, TimeResolver};
    use std::sync::{Arc, Mutex};

    fn resolver() -> TimeResolver {
        let now = chrono::Utc.with_ymd_and_hms(2026, 10, 18, 18, 30, 0).unwrap();
        TimeResolver::new(chrono_tz::America::New_York).with_clock(Arc::new(FixedClock(now)))
    }

    struct Fixture {
        calendar: Arc<InMemoryCalendar>,
        sheet: Arc<InMemorySheet>,
        executor: ScheduleToolExecutor,
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(InMemorySheet::new()), Arc::new(NoNotifier))
    }

    fn fixture_with(
        sheet: Arc<InMemorySheet>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Fixture {
        let calendar = Arc::new(InMemoryCalendar::new());
        let services = ScheduleServices {
            calendar: calendar.clone(),
            sheet: sheet.clone(),
            notifier,
            resolver: resolver(),
        };
        Fixture {
            calendar,
            sheet,
            executor: ScheduleToolExecutor::new(services),
        }
    }

    fn add_call(summary: &str) -> ToolCall {
        ToolCall::new("add_to_schedule")
            .with_arg("summary", summary)
            .with_arg("date", "tomorrow")
            .with_arg("time", "3pm")
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_result() {
        let f = fixture();
        let result = f.executor.execute(&ToolCall::new("launch_rocket")).await;

        assert!(!result.is_success());
        assert!(result.error().unwrap().is_not_found());
        assert_eq!(
            result.to_prompt_text(),
            "Error: Tool 'launch_rocket' is not available"
        );
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let f = fixture();
        let result = f.executor.execute(&ToolCall::new("remove_task")).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert_eq!(result.metadata.resolved_name.as_deref(), Some("remove_task"));
    }

    #[tokio::test]
    async fn test_add_writes_calendar_and_sheet() {
        let f = fixture();
        let result = f
            .executor
            .execute(&add_call("Team sync").with_arg("category", "work"))
            .await;

        assert!(result.is_success(), "{}", result.to_prompt_text());
        let text = result.output().unwrap();
        assert!(text.contains("[work] Team sync"));
        assert!(text.contains("Monday, October 19 at 03:00 PM"));
        assert!(result.metadata.duration_ms.is_some());

        let events = f.calendar.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.hour(), 15);
        assert_eq!(events[0].description.as_deref(), Some("Type: event\nNotes: "));

        let rows = f.sheet.rows();
        assert_eq!(
            rows,
            vec![vec![
                "10/19/2026 15:00".to_string(),
                "Team sync".to_string(),
                "event".to_string(),
                "work".to_string(),
                String::new(),
                "FALSE".to_string(),
            ]]
        );
    }

    #[tokio::test]
    async fn test_unknown_category_degrades_to_general() {
        let f = fixture();
        let result = f
            .executor
            .execute(
                &add_call("Gym")
                    .with_arg("category", "space-travel")
                    .with_arg("item_type", "ritual"),
            )
            .await;

        assert!(result.is_success());
        let events = f.calendar.events();
        assert_eq!(events[0].title, "[general] Gym");
        assert_eq!(f.sheet.rows()[0][2], "event");
    }

    #[tokio::test]
    async fn test_alias_resolves_to_canonical() {
        let f = fixture();
        let call = ToolCall::new("create_event")
            .with_arg("summary", "Dentist")
            .with_arg("date_time", "2026-10-20T09:30:00");
        let result = f.executor.execute(&call).await;

        assert!(result.is_success());
        assert_eq!(result.tool_name, "create_event");
        assert_eq!(
            result.metadata.resolved_name.as_deref(),
            Some("add_to_schedule")
        );
        assert_eq!(f.calendar.events()[0].start.minute(), 30);
    }

    #[tokio::test]
    async fn test_add_without_time_asks_for_one() {
        let f = fixture();
        let call = ToolCall::new("add_to_schedule").with_arg("summary", "Call mom");
        let result = f.executor.execute(&call).await;

        assert!(!result.is_success());
        assert!(result.to_prompt_text().contains("No start time"));
        assert!(f.calendar.events().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_time_is_reported() {
        let f = fixture();
        let call = add_call("Lunch").with_arg("time", "lunchtime-ish");
        let result = f.executor.execute(&call).await;

        assert!(!result.is_success());
        assert!(result.to_prompt_text().contains("lunchtime-ish"));
    }

    #[tokio::test]
    async fn test_check_schedule_lists_and_empty() {
        let f = fixture();
        let empty = f
            .executor
            .execute(&ToolCall::new("check_schedule").with_arg("date", "tomorrow"))
            .await;
        assert_eq!(
            empty.output(),
            Some("No events found for tomorrow (2026-10-19).")
        );

        f.executor.execute(&add_call("Team sync")).await;
        let listed = f
            .executor
            .execute(&ToolCall::new("list_events").with_arg("date", "tomorrow"))
            .await;
        assert_eq!(
            listed.output(),
            Some("Schedule for tomorrow (2026-10-19):\n- 03:00 PM: [general] Team sync")
        );
    }

    #[tokio::test]
    async fn test_check_schedule_span_accepts_float() {
        let f = fixture();
        f.executor.execute(&add_call("Team sync")).await;
        let result = f
            .executor
            .execute(&ToolCall::new("check_schedule").with_arg("span_days", 2.0))
            .await;
        assert!(result.output().unwrap().contains("Mon Oct 19 03:00 PM"));
    }

    #[tokio::test]
    async fn test_remove_task_counts() {
        let f = fixture();
        f.executor.execute(&add_call("Team sync")).await;
        f.executor.execute(&add_call("Dentist")).await;

        let result = f
            .executor
            .execute(
                &ToolCall::new("remove_task")
                    .with_arg("keyword", "SYNC")
                    .with_arg("date", "tomorrow"),
            )
            .await;

        assert_eq!(result.output(), Some("Deleted 1 event(s)."));
        assert_eq!(f.calendar.events().len(), 1);
    }

    #[tokio::test]
    async fn test_update_event_moves_and_keeps_length() {
        let f = fixture();
        f.executor
            .execute(&add_call("Team sync").with_arg("duration_hours", 1.5))
            .await;

        let result = f
            .executor
            .execute(
                &ToolCall::new("update_event")
                    .with_arg("keyword", "team sync")
                    .with_arg("date", "tomorrow")
                    .with_arg("new_time", "4:30 PM")
                    .with_arg("new_title", "Planning"),
            )
            .await;

        assert!(result.is_success(), "{}", result.to_prompt_text());
        let event = &f.calendar.events()[0];
        assert_eq!(event.title, "[general] Planning");
        assert_eq!((event.start.hour(), event.start.minute()), (16, 30));
        assert_eq!((event.end.hour(), event.end.minute()), (18, 0));
    }

    #[tokio::test]
    async fn test_update_event_no_match() {
        let f = fixture();
        let result = f
            .executor
            .execute(
                &ToolCall::new("update_event")
                    .with_arg("keyword", "yoga")
                    .with_arg("new_time", "5pm"),
            )
            .await;
        assert_eq!(
            result.output(),
            Some("No event matching 'yoga' found on today (2026-10-18).")
        );
    }

    #[tokio::test]
    async fn test_notification_not_configured() {
        let f = fixture();
        let result = f
            .executor
            .execute(&ToolCall::new("notify").with_arg("message", "Running late"))
            .await;
        assert!(result.is_success());
        assert_eq!(result.output(), Some("Email not configured."));
    }

    struct FailingSheet;

    #[async_trait]
    impl SpreadsheetPort for FailingSheet {
        async fn append_row(&self, _values: &[String]) -> Result<(), AdapterError> {
            Err(AdapterError::Http {
                status: 403,
                message: "forbidden".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_sheet_failure_is_partial_success() {
        let calendar = Arc::new(InMemoryCalendar::new());
        let executor = ScheduleToolExecutor::new(ScheduleServices {
            calendar: calendar.clone(),
            sheet: Arc::new(FailingSheet),
            notifier: Arc::new(NoNotifier),
            resolver: resolver(),
        });

        let result = executor.execute(&add_call("Team sync")).await;
        assert!(result.is_success());
        assert!(result.output().unwrap().starts_with("Partial success"));
        assert_eq!(calendar.events().len(), 1);
    }

    struct PanickingNotifier;

    #[async_trait]
    impl NotificationPort for PanickingNotifier {
        async fn send(&self, _message: &str) -> Result<NotificationOutcome, AdapterError> {
            panic!("smtp exploded");
        }
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let f = fixture_with(Arc::new(InMemorySheet::new()), Arc::new(PanickingNotifier));
        let result = f
            .executor
            .execute(&ToolCall::new("send_notification").with_arg("message", "hi"))
            .await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "PANICKED");
        assert!(result.to_prompt_text().contains("smtp exploded"));
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationPort for RecordingNotifier {
        async fn send(&self, message: &str) -> Result<NotificationOutcome, AdapterError> {
            self.sent.lock().unwrap().push(message.to_string());
            Ok(NotificationOutcome::Sent)
        }
    }

    #[tokio::test]
    async fn test_notification_sent() {
        let notifier = Arc::new(RecordingNotifier::default());
        let f = fixture_with(Arc::new(InMemorySheet::new()), notifier.clone());
        let result = f
            .executor
            .execute(&ToolCall::new("send_email").with_arg("message", "Dentist moved"))
            .await;

        assert_eq!(result.output(), Some("Email sent."));
        assert_eq!(*notifier.sent.lock().unwrap(), vec!["Dentist moved".to_string()]);
    }
}
