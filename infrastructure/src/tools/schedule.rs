//! Schedule tools: add_to_schedule, check_schedule, remove_task, update_event
//!
//! Handlers receive calls already normalised by the validator (defaults
//! filled, enum values in vocabulary) and return the prose the model reads.

use super::ScheduleServices;
use naomi_domain::schedule::{
    CalendarEvent, Category, DEFAULT_DURATION_HOURS, EventChanges, ItemType, ScheduleItem,
    duration_from_hours,
};
use naomi_domain::time::ResolvedDate;
use naomi_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};
use chrono::DateTime;
use chrono_tz::Tz;
use tracing::warn;

/// Tool name constants
pub const ADD_TO_SCHEDULE: &str = "add_to_schedule";
pub const CHECK_SCHEDULE: &str = "check_schedule";
pub const REMOVE_TASK: &str = "remove_task";
pub const UPDATE_EVENT: &str = "update_event";

/// Longest range check_schedule will list.
const MAX_SPAN_DAYS: u32 = 31;

const WHEN_FORMAT: &str = "%A, %B %d at %I:%M %p";

fn date_parameter(description: &str) -> ToolParameter {
    ToolParameter::new("date", description, false).with_default("today")
}

/// Get the tool definition for add_to_schedule
pub fn add_to_schedule_definition() -> ToolDefinition {
    ToolDefinition::new(
        ADD_TO_SCHEDULE,
        "Add an event, task, appointment or reminder to the calendar and the tracking sheet",
    )
    .with_parameter(ToolParameter::new("summary", "Short title of the item", true))
    .with_parameter(date_parameter("Day of the item: 'today', 'tomorrow' or YYYY-MM-DD"))
    .with_parameter(ToolParameter::new(
        "time",
        "Start time as the user said it, e.g. '3pm' or '15:00'",
        false,
    ))
    .with_parameter(ToolParameter::new(
        "date_time",
        "Exact ISO-8601 start, e.g. 2026-10-19T15:00:00. Overrides date and time",
        false,
    ))
    .with_parameter(
        ToolParameter::new("item_type", "Kind of item", false)
            .with_allowed_values(ItemType::names())
            .with_default(ItemType::default().as_str()),
    )
    .with_parameter(
        ToolParameter::new("category", "Life area of the item", false)
            .with_allowed_values(Category::names())
            .with_default(Category::default().as_str()),
    )
    .with_parameter(ToolParameter::new("notes", "Extra details", false).with_default(""))
    .with_parameter(
        ToolParameter::new("duration_hours", "Length in hours", false)
            .with_type("number")
            .with_default(DEFAULT_DURATION_HOURS),
    )
}

/// Get the tool definition for check_schedule
pub fn check_schedule_definition() -> ToolDefinition {
    ToolDefinition::new(CHECK_SCHEDULE, "List the events on the calendar for a day or range")
        .with_parameter(date_parameter("First day: 'today', 'tomorrow' or YYYY-MM-DD"))
        .with_parameter(
            ToolParameter::new("span_days", "Number of days to include", false)
                .with_type("integer")
                .with_default(1),
        )
}

/// Get the tool definition for remove_task
pub fn remove_task_definition() -> ToolDefinition {
    ToolDefinition::new(
        REMOVE_TASK,
        "Delete every calendar event on a day whose title contains the keyword",
    )
    .with_parameter(ToolParameter::new("keyword", "Word to match in the title", true))
    .with_parameter(date_parameter("Day to search: 'today', 'tomorrow' or YYYY-MM-DD"))
}

/// Get the tool definition for update_event
pub fn update_event_definition() -> ToolDefinition {
    ToolDefinition::new(
        UPDATE_EVENT,
        "Rename, move or resize the first calendar event on a day whose title contains the keyword",
    )
    .with_parameter(ToolParameter::new("keyword", "Word to match in the title", true))
    .with_parameter(date_parameter("Day the event is on now"))
    .with_parameter(ToolParameter::new("new_title", "New title", false))
    .with_parameter(ToolParameter::new("new_date", "New day", false))
    .with_parameter(ToolParameter::new("new_time", "New start time", false))
    .with_parameter(
        ToolParameter::new("duration_hours", "New length in hours", false).with_type("number"),
    )
}

/// Execute the add_to_schedule tool
pub async fn execute_add_to_schedule(
    services: &ScheduleServices,
    call: &ToolCall,
) -> Result<String, ToolError> {
    let summary = call.require_string("summary").map_err(ToolError::invalid_argument)?;
    let start = resolve_start(services, call)?;

    let item = ScheduleItem::new(summary, start)
        .with_item_type(ItemType::parse_lenient(call.get_string("item_type").unwrap_or_default()))
        .with_category(Category::parse_lenient(call.get_string("category").unwrap_or_default()))
        .with_notes(call.get_string("notes").unwrap_or_default())
        .with_duration_hours(number_arg(call, "duration_hours").unwrap_or(DEFAULT_DURATION_HOURS));

    let draft = item.to_event_draft();
    services
        .calendar
        .create_event(&draft)
        .await
        .map_err(|e| ToolError::execution_failed(format!("Calendar write failed: {}", e)))?;

    let when = start.format(WHEN_FORMAT);
    match services.sheet.append_row(&item.to_sheet_row()).await {
        Ok(()) => Ok(format!(
            "Success: added '{}' on {} to the calendar and the tracking sheet.",
            draft.title, when
        )),
        Err(e) => {
            warn!(error = %e, "Sheet append failed after calendar write");
            Ok(format!(
                "Partial success: added '{}' on {} to the calendar, but the tracking sheet update failed: {}",
                draft.title, when, e
            ))
        }
    }
}

/// `date_time` wins when it parses; otherwise `date` + `time`.
fn resolve_start(services: &ScheduleServices, call: &ToolCall) -> Result<DateTime<Tz>, ToolError> {
    let resolver = &services.resolver;

    let explicit = call.get_non_empty("date_time").map(|dt| resolver.parse_datetime(dt));
    if let Some(Ok(start)) = explicit {
        return Ok(start);
    }

    let date = resolver.resolve_date(call.get_string("date").unwrap_or("today"));
    match (call.get_non_empty("time"), explicit) {
        (Some(time), _) => resolver
            .resolve_point(time, date.date)
            .map_err(|e| ToolError::invalid_argument(e.to_string())),
        (None, Some(Err(e))) => Err(ToolError::invalid_argument(e.to_string())),
        (None, _) => Err(ToolError::invalid_argument(
            "No start time given. Ask the user what time it should be.",
        )),
    }
}

/// Execute the check_schedule tool
pub async fn execute_check_schedule(
    services: &ScheduleServices,
    call: &ToolCall,
) -> Result<String, ToolError> {
    let expression = call.get_string("date").unwrap_or("today");
    let resolved = services.resolver.resolve_date(expression);
    let span = number_arg(call, "span_days")
        .map(|n| n.clamp(1.0, MAX_SPAN_DAYS as f64) as u32)
        .unwrap_or(1);
    let range = services.resolver.day_range(resolved.date, span);
    let label = day_label(expression, &resolved);

    let events = services
        .calendar
        .list_events(&range)
        .await
        .map_err(|e| ToolError::execution_failed(format!("Calendar read failed: {}", e)))?;

    if events.is_empty() {
        return Ok(format!("No events found for {}.", label));
    }

    let mut text = format!("Schedule for {}:", label);
    for event in &events {
        let start = if span > 1 {
            event.start.format("%a %b %d %I:%M %p")
        } else {
            event.start.format("%I:%M %p")
        };
        text.push_str(&format!("\n- {}: {}", start, event.title));
    }
    Ok(text)
}

/// Execute the remove_task tool
pub async fn execute_remove_task(
    services: &ScheduleServices,
    call: &ToolCall,
) -> Result<String, ToolError> {
    let keyword = call.require_string("keyword").map_err(ToolError::invalid_argument)?;
    let range = services
        .resolver
        .resolve_range(call.get_string("date").unwrap_or("today"), 1);

    let deleted = services
        .calendar
        .delete_events(&range, keyword)
        .await
        .map_err(|e| ToolError::execution_failed(format!("Calendar delete failed: {}", e)))?;

    Ok(format!("Deleted {} event(s).", deleted))
}

/// Execute the update_event tool
pub async fn execute_update_event(
    services: &ScheduleServices,
    call: &ToolCall,
) -> Result<String, ToolError> {
    let keyword = call.require_string("keyword").map_err(ToolError::invalid_argument)?;
    let expression = call.get_string("date").unwrap_or("today");
    let resolved = services.resolver.resolve_date(expression);
    let range = services.resolver.day_range(resolved.date, 1);

    let event = services
        .calendar
        .find_event(&range, keyword)
        .await
        .map_err(|e| ToolError::execution_failed(format!("Calendar read failed: {}", e)))?;
    let Some(event) = event else {
        return Ok(format!(
            "No event matching '{}' found on {}.",
            keyword,
            day_label(expression, &resolved)
        ));
    };

    let changes = plan_changes(services, call, &event)?;
    if changes.is_empty() {
        return Err(ToolError::invalid_argument(format!(
            "Nothing to change for '{}'. Give a new title, date, time or duration.",
            event.title
        )));
    }

    let updated = services
        .calendar
        .update_event(&event.id, &changes)
        .await
        .map_err(|e| ToolError::execution_failed(format!("Calendar update failed: {}", e)))?;

    Ok(format!(
        "Updated '{}': now '{}' on {} until {}.",
        event.title,
        updated.title,
        updated.start.format(WHEN_FORMAT),
        updated.end.format("%I:%M %p")
    ))
}

fn plan_changes(
    services: &ScheduleServices,
    call: &ToolCall,
    event: &CalendarEvent,
) -> Result<EventChanges, ToolError> {
    let resolver = &services.resolver;
    let mut changes = EventChanges {
        title: call
            .get_non_empty("new_title")
            .map(|t| keep_category_prefix(&event.title, t)),
        ..EventChanges::default()
    };

    let new_date = call.get_non_empty("new_date").map(|d| resolver.resolve_date(d).date);
    let date = new_date.unwrap_or_else(|| event.start.date_naive());
    let start = match call.get_non_empty("new_time") {
        Some(time) => resolver
            .resolve_point(time, date)
            .map_err(|e| ToolError::invalid_argument(e.to_string()))?,
        None if new_date.is_some() => resolver.localize(date.and_time(event.start.time())),
        None => event.start,
    };

    let length = match number_arg(call, "duration_hours") {
        Some(hours) => duration_from_hours(hours),
        None => event.end - event.start,
    };

    if start != event.start {
        changes.start = Some(start);
    }
    let end = start + length;
    if end != event.end {
        changes.end = Some(end);
    }
    Ok(changes)
}

/// `[work] Old` + `New` gives `[work] New`, unless the new title has its own tag.
fn keep_category_prefix(old_title: &str, new_title: &str) -> String {
    let new_title = new_title.trim();
    if new_title.starts_with('[') {
        return new_title.to_string();
    }
    match old_title.strip_prefix('[').and_then(|rest| rest.split_once("] ")) {
        Some((tag, _)) => format!("[{}] {}", tag, new_title),
        None => new_title.to_string(),
    }
}

fn day_label(expression: &str, resolved: &ResolvedDate) -> String {
    let expression = expression.trim();
    if resolved.fell_back {
        format!("today ({})", resolved.date.format("%Y-%m-%d"))
    } else if expression.eq_ignore_ascii_case("today") || expression.eq_ignore_ascii_case("tomorrow")
    {
        format!("{} ({})", expression.to_lowercase(), resolved.date.format("%Y-%m-%d"))
    } else {
        resolved.date.format("%Y-%m-%d").to_string()
    }
}

/// Numbers arrive as ints, floats or numeric strings depending on the model.
fn number_arg(call: &ToolCall, key: &str) -> Option<f64> {
    call.get_f64(key)
        .or_else(|| call.get_non_empty(key).and_then(|s| s.parse().ok()))
        .filter(|n: &f64| n.is_finite())
}
