//! Calendar port.

use super::adapter_error::AdapterError;
use async_trait::async_trait;
use naomi_domain::{CalendarEvent, EventChanges, EventDraft, TimeRange};

/// Read and write access to one calendar.
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// Events overlapping `range`, ordered by start time.
    async fn list_events(&self, range: &TimeRange) -> Result<Vec<CalendarEvent>, AdapterError>;

    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, AdapterError>;

    async fn delete_event(&self, event_id: &str) -> Result<(), AdapterError>;

    async fn update_event(
        &self,
        event_id: &str,
        changes: &EventChanges,
    ) -> Result<CalendarEvent, AdapterError>;

    /// Delete every event in `range` whose title contains `keyword`
    /// (case-insensitive). Returns how many were deleted.
    async fn delete_events(&self, range: &TimeRange, keyword: &str) -> Result<usize, AdapterError> {
        let mut deleted = 0;
        for event in self.list_events(range).await? {
            if event.title_matches(keyword) {
                self.delete_event(&event.id).await?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// First event in `range` whose title contains `keyword`.
    async fn find_event(
        &self,
        range: &TimeRange,
        keyword: &str,
    ) -> Result<Option<CalendarEvent>, AdapterError> {
        Ok(self
            .list_events(range)
            .await?
            .into_iter()
            .find(|e| e.title_matches(keyword)))
    }
}
