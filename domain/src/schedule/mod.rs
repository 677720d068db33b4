//! Schedule records and their classification vocabularies.

pub mod entities;
pub mod vocabulary;

pub use entities::{
    CalendarEvent, DEFAULT_DURATION_HOURS, EventChanges, EventDraft, ScheduleItem,
    duration_from_hours,
};
pub use vocabulary::{Category, ItemType};
