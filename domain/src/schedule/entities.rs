//! Calendar and spreadsheet records.

use super::vocabulary::{Category, ItemType};
use crate::time::TimeRange;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;

/// Default event length when the model gives none or an unusable one.
pub const DEFAULT_DURATION_HOURS: f64 = 1.0;

/// An event as read back from a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub description: Option<String>,
}

impl CalendarEvent {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    /// Case-insensitive substring match on the title.
    pub fn title_matches(&self, keyword: &str) -> bool {
        self.title
            .to_lowercase()
            .contains(&keyword.trim().to_lowercase())
    }
}

/// A new event to be written to a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub description: String,
}

/// Partial update applied to an existing event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.start.is_none() && self.end.is_none()
    }
}

/// Something the user asked to put on their schedule.
///
/// One item fans out into a calendar event and a tracking-sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleItem {
    pub summary: String,
    pub start: DateTime<Tz>,
    pub duration_hours: f64,
    pub item_type: ItemType,
    pub category: Category,
    pub notes: String,
}

impl ScheduleItem {
    pub fn new(summary: impl Into<String>, start: DateTime<Tz>) -> Self {
        Self {
            summary: summary.into(),
            start,
            duration_hours: DEFAULT_DURATION_HOURS,
            item_type: ItemType::default(),
            category: Category::default(),
            notes: String::new(),
        }
    }

    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        self.duration_hours = hours;
        self
    }

    pub fn with_item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Event end. Non-positive or non-finite durations use the default.
    pub fn end(&self) -> DateTime<Tz> {
        self.start + duration_from_hours(self.duration_hours)
    }

    /// Calendar title, e.g. `[work] Team sync`.
    pub fn title(&self) -> String {
        format!("[{}] {}", self.category, self.summary)
    }

    pub fn to_event_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title(),
            start: self.start,
            end: self.end(),
            description: format!("Type: {}\nNotes: {}", self.item_type, self.notes),
        }
    }

    /// Row for the tracking sheet: date, summary, type, category, notes, done.
    pub fn to_sheet_row(&self) -> Vec<String> {
        vec![
            self.start.format("%m/%d/%Y %H:%M").to_string(),
            self.summary.clone(),
            self.item_type.to_string(),
            self.category.to_string(),
            self.notes.clone(),
            "FALSE".to_string(),
        ]
    }
}

/// Convert fractional hours to a whole-minute duration.
pub fn duration_from_hours(hours: f64) -> Duration {
    let hours = if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        DEFAULT_DURATION_HOURS
    };
    Duration::minutes((hours * 60.0).round().max(1.0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Tz> {
        chrono_tz::America::New_York
            .with_ymd_and_hms(2026, 10, 19, 15, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_event_draft_layout() {
        let item = ScheduleItem::new("Team sync", start())
            .with_category(Category::Work)
            .with_item_type(ItemType::Appointment)
            .with_notes("bring slides");
        let draft = item.to_event_draft();

        assert_eq!(draft.title, "[work] Team sync");
        assert_eq!(draft.description, "Type: appointment\nNotes: bring slides");
        assert_eq!(draft.end - draft.start, Duration::hours(1));
    }

    #[test]
    fn test_sheet_row() {
        let row = ScheduleItem::new("Dentist", start())
            .with_category(Category::Health)
            .to_sheet_row();
        assert_eq!(
            row,
            vec!["10/19/2026 15:00", "Dentist", "event", "health", "", "FALSE"]
        );
    }

    #[test]
    fn test_duration_fallbacks() {
        assert_eq!(duration_from_hours(1.5), Duration::minutes(90));
        assert_eq!(duration_from_hours(0.0), Duration::hours(1));
        assert_eq!(duration_from_hours(-2.0), Duration::hours(1));
        assert_eq!(duration_from_hours(f64::NAN), Duration::hours(1));
    }

    #[test]
    fn test_title_matches() {
        let event = CalendarEvent {
            id: "1".into(),
            title: "[work] Team Sync".into(),
            start: start(),
            end: start() + Duration::hours(1),
            description: None,
        };
        assert!(event.title_matches("team sync"));
        assert!(event.title_matches(" SYNC "));
        assert!(!event.title_matches("dentist"));
    }
}
