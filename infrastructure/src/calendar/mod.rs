//! Calendar adapters.
//!
//! - [`GoogleCalendar`]: Google Calendar v3 REST API
//! - [`InMemoryCalendar`]: process-local store used offline and in tests

mod google;
mod memory;

pub use google::{GOOGLE_CALENDAR_BASE_URL, GoogleCalendar};
pub use memory::InMemoryCalendar;
