//! Raw TOML configuration data types
//!
//! These structs mirror the config file section by section. Each section
//! knows how to turn itself into the runtime value it configures, reporting
//! questionable values as [`ConfigIssue`]s instead of failing.

mod assistant;
mod calendar;
mod email;
mod gemini;
mod logging;
mod sheets;

pub use assistant::FileAssistantConfig;
pub use calendar::{CalendarBackend, FileCalendarConfig};
pub use email::FileEmailConfig;
pub use gemini::FileGeminiConfig;
pub use logging::FileLoggingConfig;
pub use sheets::FileSheetsConfig;

use naomi_domain::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub assistant: FileAssistantConfig,
    pub gemini: FileGeminiConfig,
    pub calendar: FileCalendarConfig,
    pub sheets: FileSheetsConfig,
    pub email: FileEmailConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate against the process environment.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.validate_with(|name| std::env::var(name).ok())
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Timezone and attempt ceiling
    /// 2. At least one model API key
    /// 3. Calendar backend name and, for Google, an access token
    pub fn validate_with(&self, env: impl Fn(&str) -> Option<String>) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.assistant.parse_timezone().1);
        issues.extend(self.assistant.to_orchestrator_params().1);

        if self.gemini.collect_keys(&env).is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyCredentialPool,
                format!(
                    "gemini: no API key found (checked {} and gemini.api_keys)",
                    self.gemini.api_key_envs.join(", ")
                ),
            ));
        }

        let (backend, backend_issues) = self.calendar.parse_backend();
        issues.extend(backend_issues);
        if backend == CalendarBackend::Google && self.calendar.access_token(&env).is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingAccessToken,
                format!(
                    "calendar: {} is not set, using the in-memory calendar and sheet",
                    self.calendar.access_token_env
                ),
            ));
        }

        issues
    }
}
