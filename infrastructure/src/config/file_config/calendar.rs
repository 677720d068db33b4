//! Calendar configuration from TOML (`[calendar]` section)

use crate::calendar::GOOGLE_CALENDAR_BASE_URL;
use naomi_domain::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Which calendar and sheet adapters to wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarBackend {
    Google,
    Memory,
}

/// Raw calendar configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCalendarConfig {
    /// `google` or `memory`
    pub backend: String,
    pub calendar_id: String,
    pub base_url: String,
    /// Environment variable holding an OAuth access token
    pub access_token_env: String,
}

impl Default for FileCalendarConfig {
    fn default() -> Self {
        Self {
            backend: "google".to_string(),
            calendar_id: "primary".to_string(),
            base_url: GOOGLE_CALENDAR_BASE_URL.to_string(),
            access_token_env: "GOOGLE_ACCESS_TOKEN".to_string(),
        }
    }
}

impl FileCalendarConfig {
    pub fn parse_backend(&self) -> (CalendarBackend, Vec<ConfigIssue>) {
        match self.backend.trim().to_lowercase().as_str() {
            "google" => (CalendarBackend::Google, Vec::new()),
            "memory" => (CalendarBackend::Memory, Vec::new()),
            other => (
                CalendarBackend::Memory,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownCalendarBackend,
                    format!(
                        "calendar.backend: unknown value '{}', falling back to 'memory'",
                        other
                    ),
                )],
            ),
        }
    }

    pub fn access_token(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        env(&self.access_token_env).filter(|t| !t.trim().is_empty())
    }
}
