//! Google Sheets v4 append adapter.

use crate::google::{self, GoogleApiClient};
use async_trait::async_trait;
use naomi_application::ports::adapter_error::AdapterError;
use naomi_application::ports::spreadsheet::SpreadsheetPort;
use tracing::debug;

pub const GOOGLE_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Six columns: when, summary, type, category, notes, done.
pub const DEFAULT_SHEET_RANGE: &str = "WeeklyOverhaul!A:F";

/// Appends rows to one range of a Google spreadsheet.
///
/// Values are sent with `valueInputOption=USER_ENTERED` so the sheet parses
/// dates and the `FALSE` checkbox column the way a person typing would.
#[derive(Debug)]
pub struct GoogleSheet {
    client: GoogleApiClient,
    base_url: String,
    spreadsheet_id: String,
    range: String,
}

impl GoogleSheet {
    pub fn new(client: GoogleApiClient, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url: GOOGLE_SHEETS_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            range: DEFAULT_SHEET_RANGE.to_string(),
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SpreadsheetPort for GoogleSheet {
    async fn append_row(&self, values: &[String]) -> Result<(), AdapterError> {
        let append = format!("{}:append", self.range);
        let url = google::endpoint(
            &self.base_url,
            &["spreadsheets", &self.spreadsheet_id, "values", &append],
        )?;

        let request = self
            .client
            .post(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&serde_json::json!({ "values": [values] }));
        let response = google::send_json(request).await?;

        debug!(
            "Appended row to {} ({})",
            self.range,
            response
                .pointer("/updates/updatedRange")
                .and_then(|r| r.as_str())
                .unwrap_or("unknown range")
        );
        Ok(())
    }
}
