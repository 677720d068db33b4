//! Google Calendar v3 adapter.
//!
//! ```text
//! GET    {base}/calendars/{id}/events?timeMin&timeMax&singleEvents=true&orderBy=startTime
//! POST   {base}/calendars/{id}/events
//! PATCH  {base}/calendars/{id}/events/{eventId}
//! DELETE {base}/calendars/{id}/events/{eventId}
//! ```

use crate::google::{self, GoogleApiClient};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use naomi_application::ports::adapter_error::AdapterError;
use naomi_application::ports::calendar::CalendarPort;
use naomi_domain::{CalendarEvent, EventChanges, EventDraft, TimeRange};
use serde::Deserialize;
use tracing::debug;

pub const GOOGLE_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventList {
    #[serde(default)]
    items: Vec<EventResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventResource {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    start: EventTime,
    end: EventTime,
}

/// Timed events carry `dateTime`; all-day events carry `date`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

/// Calendar backed by the Google Calendar REST API.
#[derive(Debug)]
pub struct GoogleCalendar {
    client: GoogleApiClient,
    base_url: String,
    calendar_id: String,
    tz: Tz,
}

impl GoogleCalendar {
    pub fn new(client: GoogleApiClient, calendar_id: impl Into<String>, tz: Tz) -> Self {
        Self {
            client,
            base_url: GOOGLE_CALENDAR_BASE_URL.to_string(),
            calendar_id: calendar_id.into(),
            tz,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self, event_id: Option<&str>) -> Result<reqwest::Url, AdapterError> {
        let mut segments = vec!["calendars", self.calendar_id.as_str(), "events"];
        if let Some(id) = event_id {
            segments.push(id);
        }
        google::endpoint(&self.base_url, &segments)
    }

    fn event_time(&self, instant: &DateTime<Tz>) -> serde_json::Value {
        serde_json::json!({
            "dateTime": instant.to_rfc3339_opts(SecondsFormat::Secs, false),
            "timeZone": self.tz.name(),
        })
    }

    fn parse_time(&self, time: &EventTime) -> Result<DateTime<Tz>, AdapterError> {
        if let Some(raw) = &time.date_time {
            return DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&self.tz))
                .map_err(|e| AdapterError::InvalidResponse(format!("dateTime '{}': {}", raw, e)));
        }
        if let Some(raw) = &time.date {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| AdapterError::InvalidResponse(format!("date '{}': {}", raw, e)))?;
            return self
                .tz
                .from_local_datetime(&date.and_time(NaiveTime::MIN))
                .earliest()
                .ok_or_else(|| AdapterError::InvalidResponse(format!("date '{}'", raw)));
        }
        Err(AdapterError::InvalidResponse(
            "event time has neither dateTime nor date".to_string(),
        ))
    }

    fn to_event(&self, resource: EventResource) -> Result<CalendarEvent, AdapterError> {
        Ok(CalendarEvent {
            start: self.parse_time(&resource.start)?,
            end: self.parse_time(&resource.end)?,
            id: resource.id,
            title: resource.summary.unwrap_or_default(),
            description: resource.description,
        })
    }

    fn decode_event(&self, value: serde_json::Value) -> Result<CalendarEvent, AdapterError> {
        let resource: EventResource = serde_json::from_value(value)
            .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
        self.to_event(resource)
    }
}

#[async_trait]
impl CalendarPort for GoogleCalendar {
    async fn list_events(&self, range: &TimeRange) -> Result<Vec<CalendarEvent>, AdapterError> {
        let url = self.events_url(None)?;
        let time_min = range
            .start
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = range
            .end
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                ("timeMin", time_min.clone()),
                ("timeMax", time_max.clone()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let body = google::send_json(self.client.get(url.clone()).query(&query)).await?;
            let page: EventList = serde_json::from_value(body)
                .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;

            for resource in page.items {
                events.push(self.to_event(resource)?);
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            "Listed {} event(s) from calendar {}",
            events.len(),
            self.calendar_id
        );
        Ok(events)
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, AdapterError> {
        let body = serde_json::json!({
            "summary": draft.title,
            "description": draft.description,
            "start": self.event_time(&draft.start),
            "end": self.event_time(&draft.end),
        });
        let response =
            google::send_json(self.client.post(self.events_url(None)?).json(&body)).await?;
        self.decode_event(response)
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), AdapterError> {
        let response = google::send(self.client.delete(self.events_url(Some(event_id))?)).await?;
        google::check_status(response).await?;
        Ok(())
    }

    async fn update_event(
        &self,
        event_id: &str,
        changes: &EventChanges,
    ) -> Result<CalendarEvent, AdapterError> {
        let mut body = serde_json::Map::new();
        if let Some(title) = &changes.title {
            body.insert("summary".to_string(), serde_json::json!(title));
        }
        if let Some(start) = &changes.start {
            body.insert("start".to_string(), self.event_time(start));
        }
        if let Some(end) = &changes.end {
            body.insert("end".to_string(), self.event_time(end));
        }

        let request = self
            .client
            .patch(self.events_url(Some(event_id))?)
            .json(&serde_json::Value::Object(body));
        let response = google::send_json(request).await?;
        self.decode_event(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::America::New_York;
    use mockito::{Matcher, Server};

    fn calendar(server: &Server) -> GoogleCalendar {
        GoogleCalendar::new(GoogleApiClient::new("token").unwrap(), "primary", New_York)
            .with_base_url(server.url())
    }

    fn day() -> TimeRange {
        TimeRange::new(
            New_York.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap(),
            New_York.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_list_events_parses_timed_and_all_day() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/calendars/primary/events")
            .match_header("authorization", "Bearer token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("singleEvents".into(), "true".into()),
                Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
                Matcher::UrlEncoded("timeMin".into(), "2026-10-19T04:00:00Z".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"items": [
                    {"id": "a1", "summary": "[work] Team sync",
                     "start": {"dateTime": "2026-10-19T19:00:00Z"},
                     "end": {"dateTime": "2026-10-19T20:00:00Z"}},
                    {"id": "a2", "summary": "Holiday",
                     "start": {"date": "2026-10-19"}, "end": {"date": "2026-10-20"}}
                ]}"#,
            )
            .create_async()
            .await;

        let events = calendar(&server).list_events(&day()).await.unwrap();
        mock.assert_async().await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "[work] Team sync");
        assert_eq!(events[0].start.hour(), 15);
        assert_eq!(events[1].start.hour(), 0);
        assert_eq!(events[1].description, None);
    }

    #[tokio::test]
    async fn test_create_event_posts_local_times() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/calendars/primary/events")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "summary": "[work] Team sync",
                "start": {"dateTime": "2026-10-19T15:00:00-04:00", "timeZone": "America/New_York"},
            })))
            .with_status(200)
            .with_body(
                r#"{"id": "new1", "summary": "[work] Team sync",
                    "description": "Type: event\nNotes: ",
                    "start": {"dateTime": "2026-10-19T15:00:00-04:00"},
                    "end": {"dateTime": "2026-10-19T16:00:00-04:00"}}"#,
            )
            .create_async()
            .await;

        let start = New_York.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap();
        let created = calendar(&server)
            .create_event(&EventDraft {
                title: "[work] Team sync".to_string(),
                start,
                end: start + chrono::Duration::hours(1),
                description: "Type: event\nNotes: ".to_string(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, "new1");
        assert_eq!(created.start, start);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/calendars/primary/events/gone")
            .with_status(410)
            .with_body(r#"{"error": {"code": 410, "message": "Resource has been deleted"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/calendars/primary/events")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"code": 403, "message": "Insufficient Permission"}}"#)
            .create_async()
            .await;

        let calendar = calendar(&server);
        assert_eq!(
            calendar.delete_event("gone").await,
            Err(AdapterError::NotFound("Resource has been deleted".to_string()))
        );
        assert_eq!(
            calendar.list_events(&day()).await,
            Err(AdapterError::Unauthorized("Insufficient Permission".to_string()))
        );
    }
}
