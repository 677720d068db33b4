use async_trait::async_trait;
use naomi_application::ports::adapter_error::AdapterError;
use naomi_application::ports::calendar::CalendarPort;
use naomi_domain::{CalendarEvent, EventChanges, EventDraft, TimeRange};
use std::sync::Mutex;

#[derive(Default)]
struct Store {
    events: Vec<CalendarEvent>,
    next_id: u64,
}

/// Calendar kept in process memory.
///
/// Events vanish when the process exits. Ids are `mem-1`, `mem-2`, ...
#[derive(Default)]
pub struct InMemoryCalendar {
    store: Mutex<Store>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored event, ordered by start time.
    pub fn events(&self) -> Vec<CalendarEvent> {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let mut events = store.events.clone();
        events.sort_by_key(|e| e.start);
        events
    }
}

#[async_trait]
impl CalendarPort for InMemoryCalendar {
    async fn list_events(&self, range: &TimeRange) -> Result<Vec<CalendarEvent>, AdapterError> {
        Ok(self
            .events()
            .into_iter()
            .filter(|e| e.range().overlaps(range))
            .collect())
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, AdapterError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.next_id += 1;
        let event = CalendarEvent {
            id: format!("mem-{}", store.next_id),
            title: draft.title.clone(),
            start: draft.start,
            end: draft.end,
            description: (!draft.description.is_empty()).then(|| draft.description.clone()),
        };
        store.events.push(event.clone());
        Ok(event)
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), AdapterError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let before = store.events.len();
        store.events.retain(|e| e.id != event_id);
        if store.events.len() == before {
            return Err(AdapterError::NotFound(format!("event {}", event_id)));
        }
        Ok(())
    }

    async fn update_event(
        &self,
        event_id: &str,
        changes: &EventChanges,
    ) -> Result<CalendarEvent, AdapterError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let event = store
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| AdapterError::NotFound(format!("event {}", event_id)))?;

        if let Some(title) = &changes.title {
            event.title = title.clone();
        }
        if let Some(start) = changes.start {
            event.start = start;
        }
        if let Some(end) = changes.end {
            event.end = end;
        }
        Ok(event.clone())
    }
}
