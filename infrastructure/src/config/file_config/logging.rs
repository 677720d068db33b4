//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL conversation transcript path
    pub conversation_log: Option<String>,
    /// Directory for daily-rolling diagnostic logs
    pub directory: Option<String>,
}
