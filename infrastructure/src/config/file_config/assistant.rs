//! Assistant configuration from TOML (`[assistant]` section)

use chrono_tz::Tz;
use naomi_application::OrchestratorParams;
use naomi_domain::DEFAULT_TIMEZONE;
use naomi_domain::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw assistant configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAssistantConfig {
    /// Name the assistant introduces itself with
    pub name: String,
    /// IANA timezone used to resolve dates and times
    pub timezone: String,
    /// Ask for replies that read well aloud (no markdown)
    pub speech_output: bool,
    /// Ceiling on LLM attempts per turn
    pub max_attempts: usize,
    /// Per-call LLM timeout in seconds
    pub llm_timeout_secs: u64,
}

impl Default for FileAssistantConfig {
    fn default() -> Self {
        let params = OrchestratorParams::default();
        Self {
            name: params.assistant_name,
            timezone: DEFAULT_TIMEZONE.name().to_string(),
            speech_output: params.speech_output,
            max_attempts: params.max_attempts,
            llm_timeout_secs: params.llm_timeout.as_secs(),
        }
    }
}

impl FileAssistantConfig {
    /// Parse the timezone, falling back to the default with a warning.
    pub fn parse_timezone(&self) -> (Tz, Vec<ConfigIssue>) {
        match self.timezone.trim().parse::<Tz>() {
            Ok(tz) => (tz, Vec::new()),
            Err(_) => (
                DEFAULT_TIMEZONE,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownTimezone,
                    format!(
                        "assistant.timezone: unknown timezone '{}', falling back to '{}'",
                        self.timezone,
                        DEFAULT_TIMEZONE.name()
                    ),
                )],
            ),
        }
    }

    /// Build orchestrator parameters. A zero attempt ceiling becomes one.
    pub fn to_orchestrator_params(&self) -> (OrchestratorParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        if self.max_attempts == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroAttempts,
                "assistant.max_attempts: 0 would never call the model, using 1",
            ));
        }

        let params = OrchestratorParams::default()
            .with_assistant_name(self.name.clone())
            .with_speech_output(self.speech_output)
            .with_max_attempts(self.max_attempts)
            .with_llm_timeout(Duration::from_secs(self.llm_timeout_secs.max(1)));
        (params, issues)
    }
}
