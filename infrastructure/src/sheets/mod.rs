//! Tracking-sheet adapters.

mod google;
mod memory;

pub use google::{DEFAULT_SHEET_RANGE, GOOGLE_SHEETS_BASE_URL, GoogleSheet};
pub use memory::InMemorySheet;
